//! Vercel Blob adapter.

use std::time::Instant;

use async_trait::async_trait;
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{AuthStrategy, CursorTracker, FetchContext, PendingRequest};
use reqwest::header::HeaderName;
use tracing::{debug, info, instrument};

use super::api::{RawBlob, RawListResponse, API_VERSION, BLOB_API_BASE, PAGE_LIMIT};
use super::models::{summarize, BlobSummary};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// Lists a Vercel Blob store and summarizes it.
#[derive(Debug, Clone)]
pub struct BlobAdapter {
    auth: AuthStrategy,
    api_base: String,
    quota_bytes: u64,
    recent_cap: usize,
}

impl BlobAdapter {
    /// Creates an adapter for a read/write token.
    pub fn new(token: &str, quota_bytes: u64, recent_cap: usize) -> Self {
        Self {
            auth: AuthStrategy::bearer(token),
            api_base: BLOB_API_BASE.to_string(),
            quota_bytes,
            recent_cap,
        }
    }

    /// Builds the adapter if the store token is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let token = config
            .resolution(ProviderKind::VercelBlob)
            .primary()?
            .as_token()?;
        Some(Self::new(
            token,
            config.blob_quota_bytes,
            config.caps.recent_uploads,
        ))
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Lists every object and summarizes the store.
    #[instrument(skip(self, ctx))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<BlobSummary, ProviderError> {
        let started = Instant::now();
        let blobs = self.list_all(ctx).await?;
        let summary = summarize(&blobs, self.quota_bytes, self.recent_cap);

        info!(
            files = summary.summary.total_files,
            bytes = summary.summary.total_bytes,
            elapsed = ?started.elapsed(),
            "Fetched Vercel Blob data"
        );
        Ok(summary)
    }

    async fn list_all(&self, ctx: &FetchContext) -> Result<Vec<RawBlob>, ProviderError> {
        let mut blobs = Vec::new();
        let mut tracker = CursorTracker::new();
        let mut cursor: Option<String> = None;

        loop {
            let authenticated = tracker.pages() > 0;
            let mut request = PendingRequest::get(&format!("{}/", self.api_base.trim_end_matches('/')))
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?
                .query("limit", PAGE_LIMIT.to_string())
                .header(HeaderName::from_static("x-api-version"), API_VERSION);
            if let Some(cursor) = &cursor {
                request = request.query("cursor", cursor);
            }

            let page: RawListResponse = ctx
                .http
                .fetch_json(&self.auth, request)
                .await
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?;

            debug!(page = tracker.pages() + 1, objects = page.blobs.len(), "Listed blob page");
            blobs.extend(page.blobs);

            if !page.has_more {
                break;
            }
            match tracker.advance(page.cursor)? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(blobs)
    }
}

#[async_trait]
impl ProviderAdapter for BlobAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::VercelBlob
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderSummary, ProviderError> {
        self.fetch_summary(ctx).await.map(Into::into)
    }
}
