//! Vercel normalized summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::api::{RawDeployment, RawProject};
use crate::normalize::from_millis;

/// Normalized Vercel data across every configured account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelSummary {
    /// Totals over the accounts that succeeded.
    pub summary: VercelCounts,
    /// One report per account, `default` first.
    pub accounts: Vec<AccountReport>,
}

/// Scalar counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelCounts {
    /// Configured accounts.
    pub accounts: u64,
    /// Accounts whose fetch failed.
    pub failed_accounts: u64,
    /// Projects.
    pub projects: u64,
    /// Deployments listed.
    pub deployments: u64,
    /// Deployments in `READY`.
    pub ready: u64,
    /// Deployments in `ERROR`.
    pub error: u64,
    /// Deployments building or initializing.
    pub building: u64,
    /// Deployments queued.
    pub queued: u64,
    /// Deployments canceled.
    pub canceled: u64,
}

/// Data for one account. Carries an error instead when that account failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountReport {
    /// Account name.
    pub name: String,
    /// Team scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Projects.
    pub projects: Vec<ProjectRecord>,
    /// Latest deployments, newest first.
    pub deployments: Vec<DeploymentRecord>,
    /// Why this account has no data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Project id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Framework preset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    /// Last update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Deployment lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentState {
    /// Serving traffic.
    Ready,
    /// Build failed.
    Error,
    /// Building or initializing.
    Building,
    /// Waiting for a builder.
    Queued,
    /// Canceled.
    Canceled,
    /// Anything else.
    Unknown,
}

impl DeploymentState {
    /// Parses the upstream state string.
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_uppercase().as_str() {
            "READY" => Self::Ready,
            "ERROR" => Self::Error,
            "BUILDING" | "INITIALIZING" => Self::Building,
            "QUEUED" => Self::Queued,
            "CANCELED" => Self::Canceled,
            _ => Self::Unknown,
        }
    }
}

/// A deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Deployment id.
    pub id: String,
    /// Project name.
    pub project: String,
    /// Full URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// State.
    pub state: DeploymentState,
    /// `production` or `preview`.
    pub target: String,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Builds one account's report.
pub fn account_report(
    name: &str,
    team_id: Option<&str>,
    projects: Vec<RawProject>,
    deployments: Vec<RawDeployment>,
) -> AccountReport {
    AccountReport {
        name: name.to_string(),
        team_id: team_id.map(str::to_string),
        projects: projects
            .into_iter()
            .map(|p| ProjectRecord {
                id: p.id,
                name: p.name,
                framework: p.framework,
                updated_at: p.updated_at.and_then(from_millis),
            })
            .collect(),
        deployments: deployments.into_iter().map(deployment_record).collect(),
        error: None,
    }
}

/// A report for an account that failed.
pub fn failed_account(name: &str, team_id: Option<&str>, error: String) -> AccountReport {
    AccountReport {
        name: name.to_string(),
        team_id: team_id.map(str::to_string),
        projects: Vec::new(),
        deployments: Vec::new(),
        error: Some(error),
    }
}

fn deployment_record(raw: RawDeployment) -> DeploymentRecord {
    let state = raw
        .state
        .as_deref()
        .or(raw.ready_state.as_deref())
        .map_or(DeploymentState::Unknown, DeploymentState::parse);
    DeploymentRecord {
        id: raw.uid,
        project: raw.name,
        url: raw.url.map(|host| format!("https://{host}")),
        state,
        target: raw.target.unwrap_or_else(|| "preview".to_string()),
        created_at: from_millis(raw.created),
    }
}

/// Totals the account reports.
pub fn summarize(accounts: Vec<AccountReport>) -> VercelSummary {
    let mut counts = VercelCounts {
        accounts: accounts.len() as u64,
        ..VercelCounts::default()
    };

    for account in &accounts {
        if account.error.is_some() {
            counts.failed_accounts += 1;
            continue;
        }
        counts.projects += account.projects.len() as u64;
        counts.deployments += account.deployments.len() as u64;
        for deployment in &account.deployments {
            match deployment.state {
                DeploymentState::Ready => counts.ready += 1,
                DeploymentState::Error => counts.error += 1,
                DeploymentState::Building => counts.building += 1,
                DeploymentState::Queued => counts.queued += 1,
                DeploymentState::Canceled => counts.canceled += 1,
                DeploymentState::Unknown => {}
            }
        }
    }

    VercelSummary {
        summary: counts,
        accounts,
    }
}
