//! Vercel adapter.

use std::time::Instant;

use async_trait::async_trait;
use futures::future::join_all;
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{AuthStrategy, CursorTracker, FetchContext, PendingRequest};
use tracing::{debug, info, instrument, warn};

use super::api::{
    RawDeployment, RawDeploymentsResponse, RawProject, RawProjectsResponse, DEPLOYMENTS_LIMIT,
    PROJECTS_PAGE_LIMIT, VERCEL_API_BASE,
};
use super::models::{account_report, failed_account, summarize, AccountReport, VercelSummary};
use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// One configured Vercel account.
#[derive(Debug, Clone)]
pub struct VercelAccount {
    /// Account name (`default` for the unsuffixed token).
    pub name: String,
    /// Team scope.
    pub team_id: Option<String>,
    auth: AuthStrategy,
}

impl VercelAccount {
    /// Creates an account.
    pub fn new(name: impl Into<String>, token: &str, team_id: Option<String>) -> Self {
        Self {
            name: name.into(),
            team_id,
            auth: AuthStrategy::bearer(token),
        }
    }
}

/// Vercel projects and deployments across accounts.
#[derive(Debug, Clone)]
pub struct VercelAdapter {
    accounts: Vec<VercelAccount>,
    api_base: String,
}

impl VercelAdapter {
    /// Creates an adapter over the given accounts.
    pub fn new(accounts: Vec<VercelAccount>) -> Self {
        Self {
            accounts,
            api_base: VERCEL_API_BASE.to_string(),
        }
    }

    /// Builds the adapter if at least one account is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        let accounts: Vec<VercelAccount> = config
            .resolution(ProviderKind::Vercel)
            .accounts()
            .iter()
            .filter_map(|account| {
                let credentials = &account.credentials;
                Some(VercelAccount::new(
                    account.name.clone(),
                    credentials.as_token()?,
                    credentials.scope().map(str::to_string),
                ))
            })
            .collect();
        (!accounts.is_empty()).then(|| Self::new(accounts))
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Fetches every account concurrently.
    ///
    /// A failing account is reported in its own entry. Only when every
    /// account fails does the adapter fail, with the first error.
    #[instrument(skip(self, ctx), fields(accounts = self.accounts.len()))]
    pub async fn fetch_summary(&self, ctx: &FetchContext) -> Result<VercelSummary, ProviderError> {
        let started = Instant::now();
        let results = join_all(self.accounts.iter().map(|account| self.fetch_account(ctx, account))).await;

        if results.iter().all(Result::is_err) {
            if let Some(Err(first)) = results.into_iter().next() {
                return Err(first);
            }
            return Err(ProviderError::Internal("no Vercel accounts to fetch".to_string()));
        }

        let reports: Vec<AccountReport> = self
            .accounts
            .iter()
            .zip(results)
            .map(|(account, result)| match result {
                Ok(report) => report,
                Err(e) => {
                    warn!(account = %account.name, error = %e, "Vercel account failed");
                    let detail = e.to_error_detail(ProviderKind::Vercel);
                    let message = match detail.details {
                        Some(details) => format!("{}: {details}", detail.message),
                        None => detail.message,
                    };
                    failed_account(&account.name, account.team_id.as_deref(), message)
                }
            })
            .collect();

        let summary = summarize(reports);
        info!(
            projects = summary.summary.projects,
            deployments = summary.summary.deployments,
            failed_accounts = summary.summary.failed_accounts,
            elapsed = ?started.elapsed(),
            "Fetched Vercel data"
        );
        Ok(summary)
    }

    async fn fetch_account(
        &self,
        ctx: &FetchContext,
        account: &VercelAccount,
    ) -> Result<AccountReport, ProviderError> {
        let (projects, deployments) = tokio::try_join!(
            self.list_projects(ctx, account),
            self.list_deployments(ctx, account),
        )?;
        debug!(
            account = %account.name,
            projects = projects.len(),
            deployments = deployments.len(),
            "Fetched Vercel account"
        );
        Ok(account_report(
            &account.name,
            account.team_id.as_deref(),
            projects,
            deployments,
        ))
    }

    fn request(&self, path: &str, account: &VercelAccount) -> Result<PendingRequest, ProviderError> {
        let url = format!("{}{}", self.api_base.trim_end_matches('/'), path);
        let mut request = PendingRequest::get(&url).map_err(ProviderError::before_auth)?;
        if let Some(team) = &account.team_id {
            request = request.query("teamId", team);
        }
        Ok(request)
    }

    async fn list_projects(
        &self,
        ctx: &FetchContext,
        account: &VercelAccount,
    ) -> Result<Vec<RawProject>, ProviderError> {
        let mut projects = Vec::new();
        let mut tracker = CursorTracker::new();
        let mut until: Option<String> = None;

        loop {
            let authenticated = tracker.pages() > 0;
            let mut request = self
                .request("/v9/projects", account)?
                .query("limit", PROJECTS_PAGE_LIMIT.to_string());
            if let Some(until) = &until {
                request = request.query("until", until);
            }

            let page: RawProjectsResponse = ctx
                .http
                .fetch_json(&account.auth, request)
                .await
                .map_err(|e| ProviderError::from_fetch(e, authenticated))?;
            projects.extend(page.projects);

            let next = page.pagination.and_then(|p| p.next).map(|n| n.to_string());
            match tracker.advance(next)? {
                Some(next) => until = Some(next),
                None => break,
            }
        }

        Ok(projects)
    }

    async fn list_deployments(
        &self,
        ctx: &FetchContext,
        account: &VercelAccount,
    ) -> Result<Vec<RawDeployment>, ProviderError> {
        let request = self
            .request("/v6/deployments", account)?
            .query("limit", DEPLOYMENTS_LIMIT.to_string());
        let response: RawDeploymentsResponse = ctx
            .http
            .fetch_json(&account.auth, request)
            .await
            .map_err(ProviderError::before_auth)?;
        Ok(response.deployments)
    }
}

#[async_trait]
impl ProviderAdapter for VercelAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Vercel
    }

    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderSummary, ProviderError> {
        self.fetch_summary(ctx).await.map(Into::into)
    }
}
