//! Fetch context shared by all adapters.
//!
//! The context carries the one HTTP client (and with it the connection
//! pool) plus timing settings. It holds no mutable state; every adapter
//! invocation starts from zero.

use std::sync::Arc;
use std::time::Duration;

use infrapulse_core::Config;

use crate::client::HttpClient;
use crate::error::FetchError;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Timing settings for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Timeout for each HTTP request.
    pub request_timeout: Duration,
    /// Deadline for one whole adapter invocation.
    pub adapter_deadline: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: Config::DEFAULT_REQUEST_TIMEOUT,
            adapter_deadline: Config::DEFAULT_ADAPTER_DEADLINE,
        }
    }
}

impl FetchSettings {
    /// Reads timing settings from the configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            request_timeout: config.request_timeout,
            adapter_deadline: config.adapter_deadline,
        }
    }

    /// Sets the adapter deadline.
    #[must_use]
    pub fn with_adapter_deadline(mut self, deadline: Duration) -> Self {
        self.adapter_deadline = deadline;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to adapters.
#[derive(Debug, Clone)]
pub struct FetchContext {
    /// Shared HTTP client.
    pub http: Arc<HttpClient>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Creates a context from the configuration.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::builder()
            .settings(FetchSettings::from_config(config))
            .build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the per-adapter deadline.
    pub fn adapter_deadline(&self) -> Duration {
        self.settings.adapter_deadline
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Debug, Default)]
pub struct FetchContextBuilder {
    http: Option<Arc<HttpClient>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP client.
    #[must_use]
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    /// Sets the adapter deadline.
    #[must_use]
    pub fn adapter_deadline(mut self, deadline: Duration) -> Self {
        self.settings.adapter_deadline = deadline;
        self
    }

    /// Builds the fetch context, creating a client if none was set.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let http = match self.http {
            Some(http) => http,
            None => Arc::new(HttpClient::with_timeout(self.settings.request_timeout)?),
        };

        Ok(FetchContext {
            http,
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .request_timeout(Duration::from_secs(5))
            .adapter_deadline(Duration::from_secs(3))
            .build()
            .unwrap();

        assert_eq!(ctx.http.timeout(), Duration::from_secs(5));
        assert_eq!(ctx.adapter_deadline(), Duration::from_secs(3));
    }

    #[test]
    fn test_default_context() {
        let ctx = FetchContext::new().unwrap();
        assert_eq!(ctx.settings.request_timeout, Duration::from_secs(30));
        assert_eq!(ctx.settings.adapter_deadline, Duration::from_secs(25));
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.adapter_deadline = Duration::from_secs(7);
        let ctx = FetchContext::from_config(&config).unwrap();
        assert_eq!(ctx.adapter_deadline(), Duration::from_secs(7));
    }
}
