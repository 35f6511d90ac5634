//! Domain models for infrapulse.
//!
//! ## Submodules
//!
//! - [`provider`] - Provider identifiers (`ProviderKind`)
//! - [`result`] - Per-provider outcome (`ProviderResult`, `ErrorDetail`)
//! - [`dashboard`] - Fan-out aggregate (`AggregatedDashboard`, `DashboardOutcome`)

mod dashboard;
mod provider;
mod result;

// Re-export everything at the models level
pub use dashboard::{AggregatedDashboard, DashboardOutcome};
pub use provider::ProviderKind;
pub use result::{ErrorDetail, ErrorKind, ProviderResult};
#[cfg(test)]
mod serde_tests;
