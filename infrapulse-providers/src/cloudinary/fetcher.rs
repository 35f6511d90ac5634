//! Cloudinary adapter.

use std::time::Instant;

use async_trait::async_trait;
use infrapulse_core::{Config, Credentials, ProviderKind};
use infrapulse_fetch::{optional, AuthStrategy, FetchContext, FetchError, PendingRequest};
use tracing::{info, instrument};

use super::api::{RawResource, RawResources, RawUsage, CLOUDINARY_API_BASE};
use super::models::{recent_assets, usage, CloudinarySummary};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// Cloudinary usage and recent uploads.
#[derive(Debug, Clone)]
pub struct CloudinaryAdapter {
    auth: AuthStrategy,
    api_base: String,
    cloud_name: String,
    recent_cap: usize,
}

impl CloudinaryAdapter {
    /// Creates an adapter for a cloud and its key pair.
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> Self {
        Self {
            auth: AuthStrategy::signed_query(api_key, api_secret),
            api_base: CLOUDINARY_API_BASE.to_string(),
            cloud_name: cloud_name.to_string(),
            recent_cap: 10,
        }
    }

    /// Builds the adapter if cloud name, key and secret are configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        match config.resolution(ProviderKind::Cloudinary).primary()? {
            Credentials::SignedKey {
                access_key,
                secret_key,
                account_id,
            } => {
                let mut adapter = Self::new(account_id, access_key, secret_key);
                adapter.recent_cap = config.caps.recent_uploads;
                Some(adapter)
            }
            _ => None,
        }
    }

    /// Overrides the API base URL (the cloud name is appended).
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Fetches usage; recent uploads are optional.
    #[instrument(skip(self, ctx), fields(cloud = %self.cloud_name))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<CloudinarySummary, ProviderError> {
        let started = Instant::now();
        let (raw_usage, resources) = tokio::join!(
            self.usage(ctx),
            optional("cloudinary.resources", self.recent_resources(ctx)),
        );
        let raw_usage = raw_usage.map_err(ProviderError::before_auth)?;

        let summary = CloudinarySummary {
            summary: usage(&self.cloud_name, raw_usage),
            recent_uploads: resources.map(|r| recent_assets(r, self.recent_cap)),
        };
        info!(
            resources = summary.summary.resources,
            credits_percent = summary.summary.credits_percent,
            elapsed = ?started.elapsed(),
            "Fetched Cloudinary data"
        );
        Ok(summary)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}{}",
            self.api_base.trim_end_matches('/'),
            self.cloud_name,
            path
        )
    }

    async fn usage(&self, ctx: &FetchContext) -> Result<RawUsage, FetchError> {
        let request = PendingRequest::get(&self.url("/usage"))?;
        ctx.http.fetch_json(&self.auth, request).await
    }

    async fn recent_resources(&self, ctx: &FetchContext) -> Result<Vec<RawResource>, FetchError> {
        let request = PendingRequest::get(&self.url("/resources/image"))?
            .query("max_results", self.recent_cap.to_string())
            .query("direction", "desc");
        let response: RawResources = ctx.http.fetch_json(&self.auth, request).await?;
        Ok(response.resources)
    }
}

#[async_trait]
impl ProviderAdapter for CloudinaryAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Cloudinary
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderSummary, ProviderError> {
        self.fetch_summary(ctx).await.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infrapulse_core::EnvSnapshot;

    #[test]
    fn test_from_config_builds_cloud_url() {
        let env = EnvSnapshot::from_pairs([
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_API_KEY", "key"),
            ("CLOUDINARY_API_SECRET", "secret"),
        ]);
        let config = Config::from_env(&env).unwrap();
        let adapter = CloudinaryAdapter::from_config(&config).unwrap();
        assert_eq!(adapter.url("/usage"), "https://api.cloudinary.com/v1_1/demo/usage");
        assert_eq!(adapter.auth.name(), "signed_query");
    }

    #[test]
    fn test_partial_config_is_not_configured() {
        let env = EnvSnapshot::from_pairs([("CLOUDINARY_CLOUD_NAME", "demo")]);
        let config = Config::from_env(&env).unwrap();
        assert!(CloudinaryAdapter::from_config(&config).is_none());
    }
}
