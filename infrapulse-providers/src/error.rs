//! Provider adapter errors.

use std::time::Duration;

use infrapulse_core::{ErrorDetail, ErrorKind, ProviderKind, ProviderResult};
use infrapulse_fetch::FetchError;
use thiserror::Error;

/// Error returned by a provider adapter.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream rejected the credentials.
    #[error("Authentication failed with status {status}")]
    Authentication {
        /// HTTP status returned upstream.
        status: u16,
    },

    /// An upstream call failed.
    #[error("Upstream request failed: {source}")]
    Upstream {
        /// The underlying fetch error.
        #[source]
        source: FetchError,
        /// Whether an authenticated call had already succeeded.
        authenticated: bool,
    },

    /// The adapter exceeded its deadline.
    #[error("Adapter timed out after {0:?}")]
    Timeout(Duration),

    /// The adapter task could not be driven to completion.
    #[error("Adapter task failed: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Wraps an error from the first, credential-checking call.
    pub fn before_auth(error: FetchError) -> Self {
        Self::from_fetch(error, false)
    }

    /// Wraps a fetch error, remembering whether auth had succeeded.
    pub fn from_fetch(error: FetchError, authenticated: bool) -> Self {
        if error.is_authentication() {
            return Self::Authentication {
                status: error.status().unwrap_or(401),
            };
        }
        Self::Upstream {
            source: error,
            authenticated,
        }
    }

    /// The `configured` flag reported with this failure.
    pub fn configured(&self) -> bool {
        match self {
            Self::Upstream { authenticated, .. } => *authenticated,
            Self::Authentication { .. } | Self::Timeout(_) | Self::Internal(_) => false,
        }
    }

    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Upstream {
                source: FetchError::Timeout(_),
                ..
            }
            | Self::Timeout(_) => ErrorKind::Timeout,
            Self::Upstream { .. } => ErrorKind::Upstream,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Caller-facing description. Never contains credentials.
    pub fn to_error_detail(&self, provider: ProviderKind) -> ErrorDetail {
        let name = provider.display_name();
        match self {
            Self::Authentication { status } => {
                ErrorDetail::new(ErrorKind::Authentication, format!("Invalid {name} credentials"))
                    .with_details(format!("upstream returned {status}"))
                    .with_upstream_status(*status)
            }
            Self::Upstream { source, .. } => {
                let detail = ErrorDetail::new(self.kind(), format!("Failed to fetch {name} data"))
                    .with_details(short_details(source));
                match source.status() {
                    Some(status) => detail.with_upstream_status(status),
                    None => detail,
                }
            }
            Self::Timeout(deadline) => ErrorDetail::new(
                ErrorKind::Timeout,
                format!("Timed out fetching {name} data"),
            )
            .with_details(format!("no response within {}s", deadline.as_secs())),
            Self::Internal(_) => ErrorDetail::new(
                ErrorKind::Internal,
                format!("Internal error while fetching {name} data"),
            ),
        }
    }

    /// Converts into the failed result for a provider.
    pub fn into_result<T>(self, provider: ProviderKind) -> ProviderResult<T> {
        ProviderResult::failed(self.configured(), self.to_error_detail(provider))
    }
}

impl From<FetchError> for ProviderError {
    fn from(error: FetchError) -> Self {
        Self::from_fetch(error, true)
    }
}

fn short_details(error: &FetchError) -> String {
    match error {
        FetchError::Http(e) if e.is_connect() => "connection failed".to_string(),
        FetchError::Http(_) => "request failed".to_string(),
        FetchError::Timeout(d) => format!("request timed out after {}s", d.as_secs()),
        FetchError::Status { status, .. } => format!("unexpected status {status}"),
        FetchError::Authentication { status } => format!("upstream returned {status}"),
        FetchError::InvalidResponse(reason) => format!("invalid response: {reason}"),
        FetchError::Json(_) => "unexpected response shape".to_string(),
        FetchError::Url(_) => "invalid request URL".to_string(),
        FetchError::Digest(e) => format!("digest handshake failed: {e}"),
    }
}
