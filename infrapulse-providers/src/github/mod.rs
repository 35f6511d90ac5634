//! GitHub provider implementation.
//!
//! Source control. Lists every repository the token can see, then fetches
//! the latest workflow runs and open security alerts for the most recently
//! pushed repositories. Alerts from Dependabot and code scanning are ranked
//! together by severity.
//!
//! Environment: `GITHUB_TOKEN`.

mod api;
mod fetcher;
mod models;

pub use api::GITHUB_API_BASE;
pub use fetcher::{GitHubAdapter, GitHubCaps};
pub use models::{
    rank_alerts, AlertCounts, AlertSource, GitHubCounts, GitHubSummary, GitHubUser,
    LanguageCount, RepoRecord, RunRecord, SecurityAlert, Severity,
};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// GitHub descriptor.
pub fn github_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::GitHub,
        category: "Source control",
        auth: AuthScheme::Bearer,
        api_base: GITHUB_API_BASE,
        dashboard_url: "https://github.com",
        build: |config| into_shared(GitHubAdapter::from_config(config)),
    }
}
