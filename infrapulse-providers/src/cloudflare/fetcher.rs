//! Cloudflare adapter.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{
    enrich_top, optional, AuthStrategy, FetchContext, FetchError, PendingRequest,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument};

use super::api::{
    Envelope, RawBucket, RawBucketList, RawBucketUsage, RawCertificatePack, RawGraphqlResponse,
    RawWorkerScript, RawZone, CLOUDFLARE_API_BASE, ZONES_PER_PAGE, ZONE_ANALYTICS_QUERY,
};
use super::models::{
    ssl_status, sort_zones, sum_analytics, summarize, CloudflareSummary, ZoneAnalytics,
    ZoneDetail,
};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// Cloudflare zones, Workers and R2.
#[derive(Debug, Clone)]
pub struct CloudflareAdapter {
    auth: AuthStrategy,
    api_base: String,
    account_id: Option<String>,
    zone_cap: usize,
    bucket_cap: usize,
}

impl CloudflareAdapter {
    /// Creates an adapter for an API token.
    pub fn new(token: &str, account_id: Option<String>) -> Self {
        Self {
            auth: AuthStrategy::bearer(token),
            api_base: CLOUDFLARE_API_BASE.to_string(),
            account_id,
            zone_cap: 5,
            bucket_cap: 10,
        }
    }

    /// Builds the adapter if the token is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let credentials = config.resolution(ProviderKind::Cloudflare).primary()?;
        let adapter = Self::new(
            credentials.as_token()?,
            credentials.scope().map(str::to_string),
        );
        Some(adapter.with_caps(config.caps.cloudflare_zones, config.caps.r2_buckets))
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Overrides the zone and bucket enrichment caps.
    #[must_use]
    pub fn with_caps(mut self, zones: usize, buckets: usize) -> Self {
        self.zone_cap = zones;
        self.bucket_cap = buckets;
        self
    }

    /// Fetches zones, then the account sections when an account id is set.
    #[instrument(skip(self, ctx))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<CloudflareSummary, ProviderError> {
        let started = Instant::now();

        let mut zones = self.list_zones(ctx).await?;
        sort_zones(&mut zones);
        let zones = enrich_top("cloudflare.zone", zones, self.zone_cap, |zone| {
            let id = zone.id.clone();
            async move { Ok::<_, FetchError>(self.zone_detail(ctx, &id).await) }
        })
        .await;

        let (workers, buckets) = match &self.account_id {
            Some(account) => {
                let (workers, buckets) = tokio::join!(
                    optional("cloudflare.workers", self.list_workers(ctx, account)),
                    optional("cloudflare.r2", self.list_buckets(ctx, account)),
                );
                let buckets = match buckets {
                    Some(buckets) => Some(
                        enrich_top("cloudflare.r2_usage", buckets, self.bucket_cap, |bucket| {
                            let name = bucket.name.clone();
                            async move { self.bucket_usage(ctx, account, &name).await }
                        })
                        .await,
                    ),
                    None => None,
                };
                (workers, buckets)
            }
            None => {
                debug!("No account id configured, skipping Workers and R2");
                (None, None)
            }
        };

        let summary = summarize(zones, workers, buckets);
        info!(
            zones = summary.summary.total_zones,
            workers = summary.summary.workers,
            buckets = summary.summary.buckets,
            elapsed = ?started.elapsed(),
            "Fetched Cloudflare data"
        );
        Ok(summary)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        ctx: &FetchContext,
        request: PendingRequest,
    ) -> Result<Envelope<T>, FetchError> {
        let envelope: Envelope<T> = ctx.http.fetch_json(&self.auth, request).await?;
        if envelope.success {
            return Ok(envelope);
        }
        let reason = envelope
            .errors
            .first()
            .map_or_else(|| "request was not successful".to_string(), |e| format!("{} ({})", e.message, e.code));
        Err(FetchError::InvalidResponse(reason))
    }

    async fn list_zones(&self, ctx: &FetchContext) -> Result<Vec<RawZone>, ProviderError> {
        let mut zones = Vec::new();
        let mut page = 1u32;

        loop {
            let authenticated = page > 1;
            let request = PendingRequest::get(&self.url("/zones"))
                .map_err(ProviderError::before_auth)?
                .query("page", page.to_string())
                .query("per_page", ZONES_PER_PAGE.to_string());

            let envelope: Envelope<Vec<RawZone>> = self
                .get(ctx, request)
                .await
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?;
            let batch = envelope.result.unwrap_or_default();
            let total_pages = envelope.result_info.map_or(1, |info| info.total_pages);

            debug!(page, zones = batch.len(), total_pages, "Listed zone page");
            let empty = batch.is_empty();
            zones.extend(batch);

            if empty || page >= total_pages {
                break;
            }
            page += 1;
        }

        Ok(zones)
    }

    async fn zone_detail(&self, ctx: &FetchContext, zone_id: &str) -> ZoneDetail {
        let (dns_records, ssl, analytics) = tokio::join!(
            optional("cloudflare.dns", self.dns_record_count(ctx, zone_id)),
            optional("cloudflare.ssl", self.certificate_packs(ctx, zone_id)),
            optional("cloudflare.analytics", self.analytics(ctx, zone_id)),
        );
        ZoneDetail {
            dns_records,
            ssl: ssl.map(|packs| ssl_status(&packs)),
            analytics,
        }
    }

    async fn dns_record_count(&self, ctx: &FetchContext, zone_id: &str) -> Result<u64, FetchError> {
        let request = PendingRequest::get(&self.url(&format!("/zones/{zone_id}/dns_records")))?
            .query("per_page", "1");
        let envelope: Envelope<serde_json::Value> = self.get(ctx, request).await?;
        envelope
            .result_info
            .map(|info| info.total_count)
            .ok_or_else(|| FetchError::InvalidResponse("missing result_info".to_string()))
    }

    async fn certificate_packs(
        &self,
        ctx: &FetchContext,
        zone_id: &str,
    ) -> Result<Vec<RawCertificatePack>, FetchError> {
        let request =
            PendingRequest::get(&self.url(&format!("/zones/{zone_id}/ssl/certificate_packs")))?;
        let envelope: Envelope<Vec<RawCertificatePack>> = self.get(ctx, request).await?;
        Ok(envelope.result.unwrap_or_default())
    }

    async fn analytics(&self, ctx: &FetchContext, zone_id: &str) -> Result<ZoneAnalytics, FetchError> {
        let until = Utc::now();
        let since = until - ChronoDuration::hours(24);
        let request = PendingRequest::post(&self.url("/graphql"))?.json(json!({
            "query": ZONE_ANALYTICS_QUERY,
            "variables": {
                "zoneTag": zone_id,
                "since": since.to_rfc3339_opts(SecondsFormat::Secs, true),
                "until": until.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        }));

        let response: RawGraphqlResponse = ctx.http.fetch_json(&self.auth, request).await?;
        if let Some(error) = response.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(FetchError::InvalidResponse(error.message.clone()));
        }
        let groups = response
            .data
            .and_then(|data| data.viewer.zones.into_iter().next())
            .map(|zone| zone.http_requests_1h_groups)
            .unwrap_or_default();
        Ok(sum_analytics(&groups))
    }

    async fn list_workers(
        &self,
        ctx: &FetchContext,
        account: &str,
    ) -> Result<Vec<RawWorkerScript>, FetchError> {
        let request =
            PendingRequest::get(&self.url(&format!("/accounts/{account}/workers/scripts")))?;
        let envelope: Envelope<Vec<RawWorkerScript>> = self.get(ctx, request).await?;
        Ok(envelope.result.unwrap_or_default())
    }

    async fn list_buckets(
        &self,
        ctx: &FetchContext,
        account: &str,
    ) -> Result<Vec<RawBucket>, FetchError> {
        let request = PendingRequest::get(&self.url(&format!("/accounts/{account}/r2/buckets")))?;
        let envelope: Envelope<RawBucketList> = self.get(ctx, request).await?;
        Ok(envelope.result.map(|list| list.buckets).unwrap_or_default())
    }

    async fn bucket_usage(
        &self,
        ctx: &FetchContext,
        account: &str,
        bucket: &str,
    ) -> Result<RawBucketUsage, FetchError> {
        let request = PendingRequest::get(
            &self.url(&format!("/accounts/{account}/r2/buckets/{bucket}/usage")),
        )?;
        let envelope: Envelope<RawBucketUsage> = self.get(ctx, request).await?;
        envelope
            .result
            .ok_or_else(|| FetchError::InvalidResponse("missing usage result".to_string()))
    }
}

#[async_trait]
impl ProviderAdapter for CloudflareAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Cloudflare
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
    fn test_from_config_with_account() {
        let env = EnvSnapshot::from_pairs([
            ("CLOUDFLARE_API_TOKEN", "cf-token"),
            ("CLOUDFLARE_ACCOUNT_ID", "acc-1"),
            ("INFRAPULSE_CAP_CLOUDFLARE_ZONES", "2"),
        ]);
        let config = Config::from_env(&env).unwrap();
        let adapter = CloudflareAdapter::from_config(&config).unwrap();
        assert_eq!(adapter.account_id.as_deref(), Some("acc-1"));
        assert_eq!(adapter.zone_cap, 2);
        assert_eq!(adapter.bucket_cap, 10);
    }

    #[test]
    fn test_not_configured() {
        assert!(CloudflareAdapter::from_config(&Config::default()).is_none());
    }
}
