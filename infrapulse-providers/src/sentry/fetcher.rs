//! Sentry adapter.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{
    enrich_top, next_link, AuthStrategy, CursorTracker, FetchContext, FetchError, PendingRequest,
};
use tracing::{debug, info, instrument};

use super::api::{RawIssue, RawProject, RawStatPoint, ISSUES_LIMIT, SENTRY_API_BASE};
use super::models::{sum_stats, summarize, SentrySummary};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// Sentry projects, unresolved issues and event volume.
#[derive(Debug, Clone)]
pub struct SentryAdapter {
    auth: AuthStrategy,
    api_base: String,
    organization: String,
    project_cap: usize,
}

impl SentryAdapter {
    /// Creates an adapter for an organization.
    pub fn new(token: &str, organization: impl Into<String>) -> Self {
        Self {
            auth: AuthStrategy::bearer(token),
            api_base: SENTRY_API_BASE.to_string(),
            organization: organization.into(),
            project_cap: 5,
        }
    }

    /// Builds the adapter if token and organization are configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let credentials = config.resolution(ProviderKind::Sentry).primary()?;
        let adapter = Self::new(credentials.as_token()?, credentials.scope()?);
        Some(adapter.with_project_cap(config.caps.sentry_projects))
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Overrides how many projects get event totals.
    #[must_use]
    pub fn with_project_cap(mut self, cap: usize) -> Self {
        self.project_cap = cap;
        self
    }

    /// Lists projects and issues, then event totals for the first projects.
    #[instrument(skip(self, ctx), fields(org = %self.organization))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<SentrySummary, ProviderError> {
        let started = Instant::now();
        let projects = self.list_projects(ctx).await?;
        let issues = self.unresolved_issues(ctx).await?;

        let since = (Utc::now() - ChronoDuration::hours(24)).timestamp();
        let projects = enrich_top("sentry.stats", projects, self.project_cap, |project| {
            let slug = project.slug.clone();
            async move { self.events_since(ctx, &slug, since).await }
        })
        .await;

        let summary = summarize(projects, issues);
        info!(
            projects = summary.summary.projects,
            issues = summary.summary.unresolved_issues,
            events_24h = summary.summary.events_24h,
            elapsed = ?started.elapsed(),
            "Fetched Sentry data"
        );
        Ok(summary)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    async fn list_projects(&self, ctx: &FetchContext) -> Result<Vec<RawProject>, ProviderError> {
        let mut projects = Vec::new();
        let mut tracker = CursorTracker::new();
        let mut url = self.url(&format!("/organizations/{}/projects/", self.organization));

        loop {
            let authenticated = tracker.pages() > 0;
            let request = PendingRequest::get(&url).map_err(|e| ProviderError::from_fetch(e, authenticated))?;
            let (page, headers): (Vec<RawProject>, _) = ctx
                .http
                .fetch_json_with_headers(&self.auth, request)
                .await
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?;
            debug!(page = tracker.pages() + 1, projects = page.len(), "Listed Sentry projects");
            projects.extend(page);

            match tracker.advance(next_link(&headers))? {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(projects)
    }

    /// First page of unresolved issues seen in the last 24h.
    async fn unresolved_issues(&self, ctx: &FetchContext) -> Result<Vec<RawIssue>, FetchError> {
        let request = PendingRequest::get(&self.url(&format!("/organizations/{}/issues/", self.organization)))?
            .query("query", "is:unresolved")
            .query("statsPeriod", "24h")
            .query("limit", ISSUES_LIMIT.to_string());
        ctx.http.fetch_json(&self.auth, request).await
    }

    async fn events_since(&self, ctx: &FetchContext, project: &str, since: i64) -> Result<u64, FetchError> {
        let request = PendingRequest::get(&self.url(&format!("/projects/{}/{project}/stats/", self.organization)))?
            .query("stat", "received")
            .query("resolution", "1h")
            .query("since", since.to_string());
        let points: Vec<RawStatPoint> = ctx.http.fetch_json(&self.auth, request).await?;
        Ok(sum_stats(&points))
    }
}

#[async_trait]
impl ProviderAdapter for SentryAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Sentry
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderSummary, ProviderError> {
        self.fetch_summary(ctx).await.map(Into::into)
    }
}
