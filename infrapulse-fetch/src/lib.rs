// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # infrapulse Fetch
//!
//! HTTP plumbing shared by every provider adapter.
//!
//! ## Auth Engine
//!
//! The [`auth`] module provides the per-provider authentication strategies:
//!
//! - [`auth::bearer`] - `Authorization: Bearer` tokens
//! - [`auth::signed`] - timestamped signed query parameters
//! - [`auth::digest`] - RFC 2617 Digest challenge/response
//!
//! ## Fetching
//!
//! - [`client::HttpClient`] - shared client; runs the Digest handshake
//! - [`context::FetchContext`] - client plus timing settings
//! - [`paginate`] - `Link` header parsing and cursor loop detection
//! - [`guard`] - capped, failure-isolated per-child enrichment
//! - [`retry`] - 401 retry for the dashboard consumer
//!
//! ## Example
//!
//! ```ignore
//! use infrapulse_fetch::{AuthStrategy, FetchContext, PendingRequest};
//!
//! let ctx = FetchContext::new()?;
//! let auth = AuthStrategy::bearer(token);
//! let user: RawUser = ctx
//!     .http
//!     .fetch_json(&auth, PendingRequest::get("https://api.github.com/user")?)
//!     .await?;
//! ```

// Core modules
pub mod auth;
pub mod client;
pub mod context;
pub mod error;
pub mod guard;
pub mod paginate;
pub mod request;
pub mod retry;

// Re-export key types at crate root

// Errors
pub use error::{DigestError, FetchError};

// Auth
pub use auth::{
    AuthStrategy, BearerAuth, DigestAuth, DigestChallenge, QueryParamNames, SignatureScheme,
    SignedQueryAuth,
};

// Client
pub use client::{ensure_success, parse_json, HttpClient, ResponseExt};
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use request::{PendingRequest, RequestBody};

// Helpers
pub use guard::{enrich_top, optional, Enriched};
pub use paginate::{next_link, parse_link_header, CursorTracker, LinkEntry};
pub use retry::{retry_unauthorized, Backoff, RetryPolicy, StatusCarrier};
