//! Client for a running infrapulse server.

use std::time::Duration;

use anyhow::{Context, Result};
use infrapulse_fetch::{retry_unauthorized, RetryPolicy};
use serde_json::Value;
use tracing::debug;

/// A response from the dashboard endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardResponse {
    /// HTTP status.
    pub status: u16,
    /// Parsed JSON body.
    pub body: Value,
}

/// Reads the dashboard from a server, retrying transient `401`s.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    policy: RetryPolicy,
}

impl DashboardClient {
    /// Creates a client for `base_url`.
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("infrapulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            policy: RetryPolicy::auth_race(),
        })
    }

    /// `GET /api/infra`.
    pub async fn dashboard(&self) -> Result<DashboardResponse> {
        self.get("/api/infra").await
    }

    /// `GET /api/infra/{slug}`.
    pub async fn provider(&self, slug: &str) -> Result<DashboardResponse> {
        self.get(&format!("/api/infra/{slug}")).await
    }

    async fn get(&self, path: &str) -> Result<DashboardResponse> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "Requesting dashboard");

        let response = retry_unauthorized(&self.policy, || {
            let mut request = self.http.get(&url);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            request.send()
        })
        .await
        .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status().as_u16();
        let body = response
            .json::<Value>()
            .await
            .with_context(|| format!("Response from {url} was not JSON"))?;
        Ok(DashboardResponse { status, body })
    }
}
