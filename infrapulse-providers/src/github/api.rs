//! GitHub REST API schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// Constants
// ============================================================================

/// GitHub API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Media type for REST v3 JSON.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Pinned REST API version.
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Repositories requested per page.
pub const REPOS_PER_PAGE: u32 = 100;

/// Workflow runs fetched per repository.
pub const RUNS_PER_REPO: u32 = 5;

// ============================================================================
// Resources
// ============================================================================

/// The authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    /// Login.
    pub login: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRepo {
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Visibility.
    #[serde(default)]
    pub private: bool,
    /// Fork flag.
    #[serde(default)]
    pub fork: bool,
    /// Archived flag.
    #[serde(default)]
    pub archived: bool,
    /// Primary language.
    #[serde(default)]
    pub language: Option<String>,
    /// Stars.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Forks.
    #[serde(default)]
    pub forks_count: u64,
    /// Open issues and pull requests.
    #[serde(default)]
    pub open_issues_count: u64,
    /// Last push.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// `GET /repos/{repo}/actions/runs` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowRuns {
    /// Runs, newest first.
    #[serde(default)]
    pub workflow_runs: Vec<RawWorkflowRun>,
}

/// A workflow run.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkflowRun {
    /// Run id.
    pub id: u64,
    /// Workflow name.
    #[serde(default)]
    pub name: Option<String>,
    /// `queued`, `in_progress`, `completed`.
    #[serde(default)]
    pub status: Option<String>,
    /// `success`, `failure`, ... once completed.
    #[serde(default)]
    pub conclusion: Option<String>,
    /// Branch.
    #[serde(default)]
    pub head_branch: Option<String>,
    /// Trigger.
    #[serde(default)]
    pub event: Option<String>,
    /// Start time.
    pub created_at: DateTime<Utc>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A Dependabot alert.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDependabotAlert {
    /// Alert number.
    pub number: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Advisory.
    #[serde(default)]
    pub security_advisory: Option<RawAdvisory>,
    /// Affected dependency.
    #[serde(default)]
    pub dependency: Option<RawDependency>,
}

/// Advisory details.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAdvisory {
    /// `critical`, `high`, `medium`, `low`.
    #[serde(default)]
    pub severity: Option<String>,
    /// One-line summary.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Affected dependency.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDependency {
    /// Package.
    #[serde(default)]
    pub package: Option<RawPackage>,
}

/// A package.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPackage {
    /// Package name.
    pub name: String,
    /// Ecosystem.
    #[serde(default)]
    pub ecosystem: Option<String>,
}

/// A code-scanning alert.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCodeScanningAlert {
    /// Alert number.
    pub number: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Rule that fired.
    pub rule: RawRule,
}

/// A code-scanning rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRule {
    /// Rule id.
    #[serde(default)]
    pub id: Option<String>,
    /// Security severity, for security rules.
    #[serde(default)]
    pub security_severity_level: Option<String>,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}
