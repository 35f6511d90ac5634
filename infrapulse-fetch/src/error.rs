//! Fetch error types.

use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Upstream rejected the credentials (401/403).
    #[error("Authentication failed with status {status}")]
    Authentication {
        /// HTTP status returned upstream.
        status: u16,
    },

    /// Upstream returned an unexpected status.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status returned upstream.
        status: u16,
        /// Request URL without query string.
        url: String,
    },

    /// The response did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL construction error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Digest handshake error.
    #[error("Digest auth error: {0}")]
    Digest(#[from] DigestError),
}

impl FetchError {
    /// Returns the upstream HTTP status, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status } | Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the upstream rejected the credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::Digest(DigestError::MissingChallenge)
        )
    }

    /// Returns true if the upstream answered with the given status.
    pub fn is_status(&self, code: u16) -> bool {
        self.status() == Some(code)
    }

    /// Maps a non-success status to an error.
    pub fn from_status(status: u16, url: &url::Url) -> Self {
        match status {
            401 | 403 => Self::Authentication { status },
            _ => {
                let mut url = url.clone();
                url.set_query(None);
                Self::Status {
                    status,
                    url: url.to_string(),
                }
            }
        }
    }
}

// ============================================================================
// Digest Error
// ============================================================================

/// Error type for the Digest challenge/response handshake.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    /// A 401 arrived without a Digest challenge.
    #[error("401 response carried no Digest challenge")]
    MissingChallenge,

    /// The challenge uses a different scheme.
    #[error("Unsupported auth scheme: {0}")]
    UnsupportedScheme(String),

    /// The challenge lacks a required parameter.
    #[error("Digest challenge is missing `{0}`")]
    MissingParameter(&'static str),

    /// The challenge offers only unsupported qop values.
    #[error("Unsupported qop: {0}")]
    UnsupportedQop(String),

    /// The challenge asks for a hash other than MD5.
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The challenge could not be tokenized.
    #[error("Malformed challenge: {0}")]
    Malformed(String),
}
