//! Neon adapter.

use std::time::Instant;

use async_trait::async_trait;
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{enrich_top, optional, AuthStrategy, CursorTracker, FetchContext, FetchError, PendingRequest};
use tracing::{debug, info, instrument};

use super::api::{
    RawBranch, RawBranchesResponse, RawEndpoint, RawEndpointsResponse, RawProject,
    RawProjectsResponse, NEON_API_BASE, PROJECTS_PAGE_LIMIT,
};
use super::models::{project_detail, sort_projects, summarize, NeonProjectDetail, NeonSummary};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// Neon projects, branches and compute endpoints.
#[derive(Debug, Clone)]
pub struct NeonAdapter {
    auth: AuthStrategy,
    api_base: String,
    project_cap: usize,
}

impl NeonAdapter {
    /// Creates an adapter for an API key.
    pub fn new(api_key: &str) -> Self {
        Self {
            auth: AuthStrategy::bearer(api_key),
            api_base: NEON_API_BASE.to_string(),
            project_cap: 5,
        }
    }

    /// Builds the adapter if the API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let key = config.resolution(ProviderKind::Neon).primary()?.as_token()?;
        Some(Self::new(key).with_project_cap(config.caps.neon_projects))
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Overrides how many projects get branch and endpoint detail.
    #[must_use]
    pub fn with_project_cap(mut self, cap: usize) -> Self {
        self.project_cap = cap;
        self
    }

    /// Lists every project and enriches the most recently updated ones.
    #[instrument(skip(self, ctx))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<NeonSummary, ProviderError> {
        let started = Instant::now();
        let mut projects = self.list_projects(ctx).await?;
        sort_projects(&mut projects);

        let projects = enrich_top("neon.project", projects, self.project_cap, |project| {
            let id = project.id.clone();
            async move { Ok::<_, FetchError>(self.project_detail(ctx, &id).await) }
        })
        .await;

        let summary = summarize(projects);
        info!(
            projects = summary.summary.projects,
            storage_bytes = summary.summary.storage_bytes,
            elapsed = ?started.elapsed(),
            "Fetched Neon data"
        );
        Ok(summary)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    async fn list_projects(&self, ctx: &FetchContext) -> Result<Vec<RawProject>, ProviderError> {
        let mut projects = Vec::new();
        let mut tracker = CursorTracker::new();
        let mut cursor: Option<String> = None;

        loop {
            let authenticated = tracker.pages() > 0;
            let mut request = PendingRequest::get(&self.url("/projects"))
                .map_err(ProviderError::before_auth)?
                .query("limit", PROJECTS_PAGE_LIMIT.to_string());
            if let Some(cursor) = &cursor {
                request = request.query("cursor", cursor);
            }

            let page: RawProjectsResponse = ctx
                .http
                .fetch_json(&self.auth, request)
                .await
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?;

            let full_page = page.projects.len() >= PROJECTS_PAGE_LIMIT as usize;
            debug!(page = tracker.pages() + 1, projects = page.projects.len(), "Listed Neon projects");
            projects.extend(page.projects);

            // A short page is the last one; the cursor is echoed back regardless.
            if !full_page {
                break;
            }
            match tracker.advance(page.pagination.and_then(|p| p.cursor))? {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(projects)
    }

    async fn project_detail(&self, ctx: &FetchContext, project_id: &str) -> NeonProjectDetail {
        let (branches, endpoints) = tokio::join!(
            optional("neon.branches", self.branches(ctx, project_id)),
            optional("neon.endpoints", self.endpoints(ctx, project_id)),
        );
        project_detail(branches, endpoints)
    }

    async fn branches(&self, ctx: &FetchContext, project_id: &str) -> Result<Vec<RawBranch>, FetchError> {
        let request = PendingRequest::get(&self.url(&format!("/projects/{project_id}/branches")))?;
        let response: RawBranchesResponse = ctx.http.fetch_json(&self.auth, request).await?;
        Ok(response.branches)
    }

    async fn endpoints(&self, ctx: &FetchContext, project_id: &str) -> Result<Vec<RawEndpoint>, FetchError> {
        let request = PendingRequest::get(&self.url(&format!("/projects/{project_id}/endpoints")))?;
        let response: RawEndpointsResponse = ctx.http.fetch_json(&self.auth, request).await?;
        Ok(response.endpoints)
    }
}

#[async_trait]
impl ProviderAdapter for NeonAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Neon
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
    fn test_from_config() {
        let env = EnvSnapshot::from_pairs([("NEON_API_KEY", "napi_x")]);
        let config = Config::from_env(&env).unwrap();
        let adapter = NeonAdapter::from_config(&config).unwrap();
        assert_eq!(adapter.project_cap, 5);
        assert_eq!(adapter.url("/projects"), "https://console.neon.tech/api/v2/projects");
    }
}
