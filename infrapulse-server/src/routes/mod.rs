//! Route handlers.

pub mod health;
pub mod infra;

pub use health::{health_handler, HealthResponse};
pub use infra::{dashboard_handler, provider_handler};
