// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # infrapulse Core
//!
//! Core types, models, and configuration for infrapulse.
//!
//! This crate provides the foundational abstractions used across all other
//! infrapulse crates, including:
//!
//! - Domain models (providers, per-provider results, the aggregated dashboard)
//! - The explicit [`Config`] and the environment-backed [`ConfigResolver`]
//! - Error types
//!
//! ## Key Types
//!
//! ### Provider Types
//! - [`ProviderKind`] - Enum of all supported infrastructure providers
//! - [`ProviderResult`] - Outcome of one provider adapter invocation
//! - [`ErrorDetail`] - Caller-facing description of a provider failure
//!
//! ### Aggregation
//! - [`AggregatedDashboard`] - Provider name to result mapping
//! - [`DashboardOutcome`] - Derived overall outcome of a fan-out
//!
//! ### Configuration
//! - [`EnvSnapshot`] - Immutable view of the process environment
//! - [`Credentials`] / [`NamedCredentials`] - Provider credentials
//! - [`Resolution`] - Configured or not, per provider
//! - [`EnumerationCaps`] - Per-adapter detail fan-out limits

pub mod config;
pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export configuration types
pub use config::{
    Config, ConfigResolver, Credentials, EnumerationCaps, EnvSnapshot, NamedCredentials,
    Resolution, ServerSettings,
};

// Re-export all model types
pub use models::{
    AggregatedDashboard, DashboardOutcome, ErrorDetail, ErrorKind, ProviderKind, ProviderResult,
};
