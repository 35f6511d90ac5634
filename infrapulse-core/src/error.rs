//! Core error types for infrapulse.

use thiserror::Error;

/// Core error type for infrapulse operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown provider name.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {key} = {value:?} ({reason})")]
    InvalidConfig {
        /// Environment variable name.
        key: String,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
