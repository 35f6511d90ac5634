//! UptimeRobot adapter.

use std::time::Instant;

use async_trait::async_trait;
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{AuthStrategy, FetchContext, FetchError, PendingRequest};
use tracing::{debug, info, instrument};

use super::api::{RawMonitor, RawMonitorsResponse, PAGE_LIMIT, UPTIMEROBOT_API_BASE, UPTIME_WINDOWS};
use super::models::{summarize, UptimeRobotSummary};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// UptimeRobot monitors. The API key travels in the form body.
#[derive(Clone)]
pub struct UptimeRobotAdapter {
    api_key: String,
    api_base: String,
}

impl std::fmt::Debug for UptimeRobotAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UptimeRobotAdapter")
            .field("api_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl UptimeRobotAdapter {
    /// Creates an adapter for a read-only or main API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: UPTIMEROBOT_API_BASE.to_string(),
        }
    }

    /// Builds the adapter if the API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let key = config.resolution(ProviderKind::UptimeRobot).primary()?.as_token()?;
        Some(Self::new(key))
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Pages through every monitor.
    #[instrument(skip(self, ctx))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<UptimeRobotSummary, ProviderError> {
        let started = Instant::now();
        let mut monitors: Vec<RawMonitor> = Vec::new();
        let mut offset = 0u64;

        loop {
            let authenticated = offset > 0;
            let page = self
                .page(ctx, offset)
                .await
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?;

            if page.stat != "ok" {
                return Err(page_failure(&page, authenticated));
            }

            let total = page.pagination.as_ref().map_or(0, |p| p.total);
            let received = page.monitors.len() as u64;
            debug!(offset, received, total, "Listed UptimeRobot monitors");
            monitors.extend(page.monitors);

            offset += received;
            if received == 0 || offset >= total {
                break;
            }
        }

        let summary = summarize(monitors);
        info!(
            monitors = summary.summary.monitors,
            down = summary.summary.down,
            elapsed = ?started.elapsed(),
            "Fetched UptimeRobot data"
        );
        Ok(summary)
    }

    async fn page(&self, ctx: &FetchContext, offset: u64) -> Result<RawMonitorsResponse, FetchError> {
        let url = format!("{}/getMonitors", self.api_base.trim_end_matches('/'));
        let request = PendingRequest::post(&url)?.form(vec![
            ("api_key".to_string(), self.api_key.clone()),
            ("format".to_string(), "json".to_string()),
            ("logs".to_string(), "0".to_string()),
            ("custom_uptime_ratios".to_string(), UPTIME_WINDOWS.to_string()),
            ("offset".to_string(), offset.to_string()),
            ("limit".to_string(), PAGE_LIMIT.to_string()),
        ]);
        ctx.http.fetch_json(&AuthStrategy::Unauthenticated, request).await
    }
}

/// Maps a `stat: fail` body. A rejected key is an authentication failure.
fn page_failure(page: &RawMonitorsResponse, authenticated: bool) -> ProviderError {
    match &page.error {
        Some(error) if error.is_api_key_error() => ProviderError::Authentication { status: 401 },
        error => {
            let reason = error
                .as_ref()
                .and_then(|e| e.message.clone().or_else(|| e.error_type.clone()))
                .unwrap_or_else(|| "request failed".to_string());
            ProviderError::from_fetch(FetchError::InvalidResponse(reason), authenticated)
        }
    }
}

#[async_trait]
impl ProviderAdapter for UptimeRobotAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::UptimeRobot
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderSummary, ProviderError> {
        self.fetch_summary(ctx).await.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(json: &str) -> RawMonitorsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_api_key_failure_is_authentication() {
        let page = failed(r#"{"stat":"fail","error":{"type":"invalid_parameter","parameter_name":"api_key"}}"#);
        assert!(matches!(
            page_failure(&page, false),
            ProviderError::Authentication { status: 401 }
        ));
    }

    #[test]
    fn test_other_failure_is_upstream() {
        let page = failed(r#"{"stat":"fail","error":{"type":"internal","message":"try later"}}"#);
        let err = page_failure(&page, true);
        assert!(matches!(err, ProviderError::Upstream { authenticated: true, .. }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", UptimeRobotAdapter::new("u123-secret"));
        assert!(!debug.contains("secret"));
    }
}
