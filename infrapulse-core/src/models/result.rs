//! Per-provider result types.
//!
//! A [`ProviderResult`] is created once per adapter invocation and never
//! mutated afterwards. Its three states map onto the three JSON shapes the
//! HTTP boundary returns:
//!
//! | State | JSON |
//! |-------|------|
//! | `NotConfigured` | `{ "configured": false, "message": ... }` |
//! | `Failed` | `{ "configured": bool, "error": ..., "details"?: ... }` |
//! | `Ready(T)` | `{ "configured": true, ...T }` |

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// Error Detail
// ============================================================================

/// Category of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Credentials were present but rejected upstream.
    Authentication,
    /// Network failure, unexpected status, or unexpected response shape.
    Upstream,
    /// The adapter did not finish within its deadline.
    Timeout,
    /// The adapter crashed or could not be driven to completion.
    Internal,
}

/// Caller-facing description of a provider failure.
///
/// `message` is generic and safe to show; `details` carries a short
/// technical hint (never credentials).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Failure category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Optional technical detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// HTTP status returned by the upstream provider, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,
}

impl ErrorDetail {
    /// Creates a new error detail.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            upstream_status: None,
        }
    }

    /// Attaches technical details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attaches the upstream HTTP status.
    #[must_use]
    pub fn with_upstream_status(mut self, status: u16) -> Self {
        self.upstream_status = Some(status);
        self
    }
}

// ============================================================================
// Provider Result
// ============================================================================

/// Outcome of one provider adapter invocation.
///
/// A not-configured provider can never carry data, and a configured one
/// carries exactly one of data or error.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResult<T> {
    /// No credentials in this environment. Not an error.
    NotConfigured {
        /// Remediation hint naming the variables to set.
        message: String,
    },
    /// The adapter failed.
    Failed {
        /// Whether authentication had already succeeded.
        configured: bool,
        /// What went wrong.
        error: ErrorDetail,
    },
    /// The adapter produced a normalized summary.
    Ready(T),
}

impl<T> ProviderResult<T> {
    /// Creates a not-configured result.
    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::NotConfigured {
            message: message.into(),
        }
    }

    /// Creates a failed result.
    pub fn failed(configured: bool, error: ErrorDetail) -> Self {
        Self::Failed { configured, error }
    }

    /// Creates a successful result.
    pub fn ready(data: T) -> Self {
        Self::Ready(data)
    }

    /// The `configured` flag as exposed on the wire.
    pub fn configured(&self) -> bool {
        match self {
            Self::NotConfigured { .. } => false,
            Self::Failed { configured, .. } => *configured,
            Self::Ready(_) => true,
        }
    }

    /// Returns true if credentials were present for this provider.
    ///
    /// Unlike [`configured`](Self::configured), this is true for
    /// authentication failures too.
    pub fn has_credentials(&self) -> bool {
        !matches!(self, Self::NotConfigured { .. })
    }

    /// Returns the summary, if the adapter succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the error, if the adapter failed.
    pub fn error(&self) -> Option<&ErrorDetail> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Returns true if the adapter succeeded.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Returns true if the adapter failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// HTTP status the boundary answers with for this result.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotConfigured { .. } | Self::Ready(_) => 200,
            Self::Failed { error, .. } if error.kind == ErrorKind::Authentication => 401,
            Self::Failed { .. } => 500,
        }
    }

    /// Maps the summary type.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ProviderResult<U> {
        match self {
            Self::NotConfigured { message } => ProviderResult::NotConfigured { message },
            Self::Failed { configured, error } => ProviderResult::Failed { configured, error },
            Self::Ready(data) => ProviderResult::Ready(f(data)),
        }
    }
}

impl<T: Serialize> Serialize for ProviderResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct ReadyWire<'a, T: Serialize> {
            configured: bool,
            #[serde(flatten)]
            data: &'a T,
        }

        match self {
            Self::NotConfigured { message } => {
                let mut state = serializer.serialize_struct("ProviderResult", 2)?;
                state.serialize_field("configured", &false)?;
                state.serialize_field("message", message)?;
                state.end()
            }
            Self::Failed { configured, error } => {
                let len = if error.details.is_some() { 3 } else { 2 };
                let mut state = serializer.serialize_struct("ProviderResult", len)?;
                state.serialize_field("configured", configured)?;
                state.serialize_field("error", &error.message)?;
                if let Some(details) = &error.details {
                    state.serialize_field("details", details)?;
                }
                state.end()
            }
            Self::Ready(data) => ReadyWire {
                configured: true,
                data,
            }
            .serialize(serializer),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_has_no_data() {
        let result: ProviderResult<u32> = ProviderResult::not_configured("Set FOO");
        assert!(!result.configured());
        assert!(!result.has_credentials());
        assert!(result.data().is_none());
        assert!(result.error().is_none());
        assert_eq!(result.http_status(), 200);
    }

    #[test]
    fn test_failed_status_codes() {
        let auth: ProviderResult<u32> = ProviderResult::failed(
            false,
            ErrorDetail::new(ErrorKind::Authentication, "Invalid credentials"),
        );
        assert_eq!(auth.http_status(), 401);
        assert!(auth.has_credentials());

        let upstream: ProviderResult<u32> = ProviderResult::failed(
            true,
            ErrorDetail::new(ErrorKind::Upstream, "Failed to fetch"),
        );
        assert_eq!(upstream.http_status(), 500);
        assert!(upstream.configured());
    }

    #[test]
    fn test_map_preserves_state() {
        let ready = ProviderResult::ready(2_u32).map(|v| v * 10);
        assert_eq!(ready.data(), Some(&20));

        let failed: ProviderResult<u32> =
            ProviderResult::failed(true, ErrorDetail::new(ErrorKind::Timeout, "slow"));
        let mapped = failed.map(|v| v.to_string());
        assert_eq!(mapped.error().map(|e| e.kind), Some(ErrorKind::Timeout));
    }
}
