//! GitHub adapter.

use std::time::Instant;

use async_trait::async_trait;
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{
    enrich_top, next_link, optional, AuthStrategy, CursorTracker, FetchContext, FetchError,
    PendingRequest,
};
use reqwest::header::{HeaderName, ACCEPT};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::api::{
    RawCodeScanningAlert, RawDependabotAlert, RawRepo, RawUser, RawWorkflowRun, RawWorkflowRuns,
    GITHUB_ACCEPT, GITHUB_API_BASE, GITHUB_API_VERSION, REPOS_PER_PAGE, RUNS_PER_REPO,
};
use super::models::{
    code_scanning_alert, dependabot_alert, sort_repos, summarize, GitHubSummary, SecurityAlert,
};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// Enumeration caps for the GitHub fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitHubCaps {
    /// Repositories that get workflow runs.
    pub workflow_repos: usize,
    /// Repositories scanned for alerts.
    pub alert_repos: usize,
    /// Alerts kept after ranking.
    pub alerts_display: usize,
}

impl Default for GitHubCaps {
    fn default() -> Self {
        Self {
            workflow_repos: 5,
            alert_repos: 3,
            alerts_display: 20,
        }
    }
}

/// GitHub repositories, workflow runs and security alerts.
#[derive(Debug, Clone)]
pub struct GitHubAdapter {
    auth: AuthStrategy,
    api_base: String,
    caps: GitHubCaps,
}

impl GitHubAdapter {
    /// Creates an adapter for a personal access token.
    pub fn new(token: &str) -> Self {
        Self {
            auth: AuthStrategy::bearer(token),
            api_base: GITHUB_API_BASE.to_string(),
            caps: GitHubCaps::default(),
        }
    }

    /// Builds the adapter if the token is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let token = config.resolution(ProviderKind::GitHub).primary()?.as_token()?;
        Some(Self::new(token).with_caps(GitHubCaps {
            workflow_repos: config.caps.github_workflow_repos,
            alert_repos: config.caps.github_alert_repos,
            alerts_display: config.caps.alerts_display,
        }))
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Overrides the enumeration caps.
    #[must_use]
    pub fn with_caps(mut self, caps: GitHubCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Fetches the user, all repositories, then runs and alerts for the
    /// most recently pushed repositories.
    #[instrument(skip(self, ctx))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<GitHubSummary, ProviderError> {
        let started = Instant::now();

        let user: RawUser = self
            .get(ctx, self.request("/user").map_err(ProviderError::before_auth)?)
            .await
            .map_err(ProviderError::before_auth)?;
        let mut repos = self.list_repos(ctx).await?;
        sort_repos(&mut repos);
        debug!(login = %user.login, repos = repos.len(), "Listed GitHub repositories");

        let alert_targets: Vec<String> = repos
            .iter()
            .take(self.caps.alert_repos)
            .map(|r| r.full_name.clone())
            .collect();

        let (repos, alerts) = tokio::join!(
            enrich_top("github.runs", repos, self.caps.workflow_repos, |repo| {
                let full_name = repo.full_name.clone();
                async move { self.workflow_runs(ctx, &full_name).await }
            }),
            enrich_top("github.alerts", alert_targets, self.caps.alert_repos, |repo| {
                let repo = repo.clone();
                async move { Ok::<_, FetchError>(self.repo_alerts(ctx, &repo).await) }
            }),
        );
        let alerts: Vec<SecurityAlert> = alerts.into_iter().filter_map(|e| e.detail).flatten().collect();

        let summary = summarize(user, repos, alerts, self.caps.alerts_display);
        info!(
            repos = summary.summary.repos,
            alerts = summary.summary.alerts.total,
            failed_runs = summary.summary.failed_runs,
            elapsed = ?started.elapsed(),
            "Fetched GitHub data"
        );
        Ok(summary)
    }

    fn request(&self, path: &str) -> Result<PendingRequest, FetchError> {
        let url = format!("{}{}", self.api_base.trim_end_matches('/'), path);
        Ok(Self::with_headers(PendingRequest::get(&url)?))
    }

    fn with_headers(request: PendingRequest) -> PendingRequest {
        request
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(HeaderName::from_static("x-github-api-version"), GITHUB_API_VERSION)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        ctx: &FetchContext,
        request: PendingRequest,
    ) -> Result<T, FetchError> {
        ctx.http.fetch_json(&self.auth, request).await
    }

    async fn list_repos(&self, ctx: &FetchContext) -> Result<Vec<RawRepo>, ProviderError> {
        let mut repos = Vec::new();
        let mut tracker = CursorTracker::new();
        let mut request = self
            .request("/user/repos")?
            .query("sort", "pushed")
            .query("direction", "desc")
            .query("per_page", REPOS_PER_PAGE.to_string());

        loop {
            let (page, headers): (Vec<RawRepo>, _) = ctx
                .http
                .fetch_json_with_headers(&self.auth, request)
                .await?;
            debug!(page = tracker.pages() + 1, repos = page.len(), "Listed repository page");
            repos.extend(page);

            match tracker.advance(next_link(&headers))? {
                Some(next) => request = Self::with_headers(PendingRequest::get(&next)?),
                None => break,
            }
        }

        Ok(repos)
    }

    async fn workflow_runs(
        &self,
        ctx: &FetchContext,
        repo: &str,
    ) -> Result<Vec<RawWorkflowRun>, FetchError> {
        let request = self
            .request(&format!("/repos/{repo}/actions/runs"))?
            .query("per_page", RUNS_PER_REPO.to_string());
        let runs: RawWorkflowRuns = self.get(ctx, request).await?;
        Ok(runs.workflow_runs)
    }

    /// Open alerts from both scanners. A scanner that is disabled for the
    /// repository (403/404) contributes nothing.
    async fn repo_alerts(&self, ctx: &FetchContext, repo: &str) -> Vec<SecurityAlert> {
        let (dependabot, code_scanning) = tokio::join!(
            optional("github.dependabot", self.dependabot_alerts(ctx, repo)),
            optional("github.code_scanning", self.code_scanning_alerts(ctx, repo)),
        );

        let mut alerts: Vec<SecurityAlert> = dependabot
            .unwrap_or_default()
            .into_iter()
            .map(|a| dependabot_alert(repo, a))
            .collect();
        alerts.extend(
            code_scanning
                .unwrap_or_default()
                .into_iter()
                .map(|a| code_scanning_alert(repo, a)),
        );
        alerts
    }

    async fn dependabot_alerts(
        &self,
        ctx: &FetchContext,
        repo: &str,
    ) -> Result<Vec<RawDependabotAlert>, FetchError> {
        let request = self
            .request(&format!("/repos/{repo}/dependabot/alerts"))?
            .query("state", "open")
            .query("per_page", "100");
        self.get(ctx, request).await
    }

    async fn code_scanning_alerts(
        &self,
        ctx: &FetchContext,
        repo: &str,
    ) -> Result<Vec<RawCodeScanningAlert>, FetchError> {
        let request = self
            .request(&format!("/repos/{repo}/code-scanning/alerts"))?
            .query("state", "open")
            .query("per_page", "100");
        self.get(ctx, request).await
    }
}

#[async_trait]
impl ProviderAdapter for GitHubAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GitHub
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
    fn test_from_config_caps() {
        let env = EnvSnapshot::from_pairs([
            ("GITHUB_TOKEN", "ghp_x"),
            ("INFRAPULSE_CAP_ALERTS_DISPLAY", "50"),
        ]);
        let config = Config::from_env(&env).unwrap();
        let adapter = GitHubAdapter::from_config(&config).unwrap();
        assert_eq!(
            adapter.caps,
            GitHubCaps {
                workflow_repos: 5,
                alert_repos: 3,
                alerts_display: 50,
            }
        );
    }

    #[test]
    fn test_requests_carry_api_headers() {
        let request = GitHubAdapter::new("t").request("/user").unwrap();
        assert_eq!(request.headers[ACCEPT], GITHUB_ACCEPT);
        assert_eq!(request.headers["x-github-api-version"], GITHUB_API_VERSION);
    }
}
