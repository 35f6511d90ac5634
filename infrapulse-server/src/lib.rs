// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # infrapulse Server
//!
//! The HTTP boundary: a liveness probe plus the admin-only dashboard
//! endpoints backed by the fan-out aggregator.
//!
//! | Route | Auth | Response |
//! |-------|------|----------|
//! | `GET /health` | none | `{ status, version, uptimeSeconds }` |
//! | `GET /api/infra` | admin | aggregated dashboard, always 200 |
//! | `GET /api/infra/{provider}` | admin | one provider result; 404 for unknown slugs |

pub mod error;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use error::ServerError;
pub use server::{build_router, serve, shutdown_signal};
pub use session::{SessionFact, SessionVerifier, StaticTokenVerifier, ADMIN_TOKEN_HEADER};
pub use state::AppState;
