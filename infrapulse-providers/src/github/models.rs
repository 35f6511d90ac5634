//! GitHub normalized summary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use infrapulse_fetch::Enriched;
use serde::Serialize;

use super::api::{RawCodeScanningAlert, RawDependabotAlert, RawRepo, RawUser, RawWorkflowRun};

// ============================================================================
// Severity
// ============================================================================

/// Alert severity. Ordered most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Critical.
    Critical,
    /// High.
    High,
    /// Medium (Dependabot calls it `moderate`).
    Medium,
    /// Low.
    Low,
    /// Missing or unrecognized.
    Unknown,
}

impl Severity {
    /// Parses an upstream severity label.
    pub fn parse(label: Option<&str>) -> Self {
        match label.map(str::to_ascii_lowercase).as_deref() {
            Some("critical") => Self::Critical,
            Some("high") => Self::High,
            Some("medium" | "moderate") => Self::Medium,
            Some("low") => Self::Low,
            _ => Self::Unknown,
        }
    }
}

// ============================================================================
// Summary Types
// ============================================================================

/// Normalized GitHub data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubSummary {
    /// Scalar counts.
    pub summary: GitHubCounts,
    /// Authenticated user.
    pub user: GitHubUser,
    /// Repositories per primary language, most used first.
    pub languages: Vec<LanguageCount>,
    /// Every repository, most recently pushed first.
    pub repositories: Vec<RepoRecord>,
    /// Most severe open alerts, then newest.
    pub alerts: Vec<SecurityAlert>,
}

/// Scalar counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubCounts {
    /// Repositories.
    pub repos: u64,
    /// Public repositories.
    pub public_repos: u64,
    /// Private repositories.
    pub private_repos: u64,
    /// Stars across repositories.
    pub stars: u64,
    /// Forks across repositories.
    pub forks: u64,
    /// Open issues across repositories.
    pub open_issues: u64,
    /// Failed runs among the fetched workflow runs.
    pub failed_runs: u64,
    /// Open alerts by severity, before display truncation.
    pub alerts: AlertCounts,
}

/// Open alert counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertCounts {
    /// All open alerts.
    pub total: u64,
    /// Critical.
    pub critical: u64,
    /// High.
    pub high: u64,
    /// Medium.
    pub medium: u64,
    /// Low.
    pub low: u64,
    /// Unknown severity.
    pub unknown: u64,
}

/// The authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubUser {
    /// Login.
    pub login: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Repositories using a language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCount {
    /// Language.
    pub language: String,
    /// Repositories.
    pub repos: u64,
}

/// A repository.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoRecord {
    /// `owner/name`.
    pub full_name: String,
    /// Private flag.
    pub private: bool,
    /// Fork flag.
    pub fork: bool,
    /// Archived flag.
    pub archived: bool,
    /// Primary language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Stars.
    pub stars: u64,
    /// Forks.
    pub forks: u64,
    /// Open issues.
    pub open_issues: u64,
    /// Last push.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<DateTime<Utc>>,
    /// Web URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Latest workflow runs, for the most recently pushed repositories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_runs: Option<Vec<RunRecord>>,
}

/// A workflow run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRecord {
    /// Run id.
    pub id: u64,
    /// Workflow name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Conclusion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<String>,
    /// Branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Start time.
    pub created_at: DateTime<Utc>,
    /// Web URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RunRecord {
    /// Whether the run completed unsuccessfully.
    pub fn failed(&self) -> bool {
        matches!(
            self.conclusion.as_deref(),
            Some("failure" | "timed_out" | "startup_failure")
        )
    }
}

/// Which scanner raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSource {
    /// Dependabot.
    Dependabot,
    /// Code scanning.
    CodeScanning,
}

/// An open security alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityAlert {
    /// `owner/name`.
    pub repo: String,
    /// Scanner.
    pub source: AlertSource,
    /// Alert number within the repository.
    pub number: u64,
    /// Severity.
    pub severity: Severity,
    /// Summary or rule description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Affected package, for Dependabot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Web URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// ============================================================================
// Normalization
// ============================================================================

/// Orders repositories most recently pushed first.
pub fn sort_repos(repos: &mut [RawRepo]) {
    repos.sort_by(|a, b| b.pushed_at.cmp(&a.pushed_at).then_with(|| a.full_name.cmp(&b.full_name)));
}

/// Maps workflow runs.
pub fn run_records(runs: Vec<RawWorkflowRun>) -> Vec<RunRecord> {
    runs.into_iter()
        .map(|run| RunRecord {
            id: run.id,
            name: run.name,
            status: run.status,
            conclusion: run.conclusion,
            branch: run.head_branch,
            event: run.event,
            created_at: run.created_at,
            url: run.html_url,
        })
        .collect()
}

/// Maps a Dependabot alert.
pub fn dependabot_alert(repo: &str, raw: RawDependabotAlert) -> SecurityAlert {
    let (severity, summary) = match raw.security_advisory {
        Some(advisory) => (Severity::parse(advisory.severity.as_deref()), advisory.summary),
        None => (Severity::Unknown, None),
    };
    SecurityAlert {
        repo: repo.to_string(),
        source: AlertSource::Dependabot,
        number: raw.number,
        severity,
        summary,
        package: raw.dependency.and_then(|d| d.package).map(|p| p.name),
        created_at: raw.created_at,
        url: raw.html_url,
    }
}

/// Maps a code-scanning alert. Only security rules carry a severity.
pub fn code_scanning_alert(repo: &str, raw: RawCodeScanningAlert) -> SecurityAlert {
    SecurityAlert {
        repo: repo.to_string(),
        source: AlertSource::CodeScanning,
        number: raw.number,
        severity: Severity::parse(raw.rule.security_severity_level.as_deref()),
        summary: raw.rule.description.or(raw.rule.id),
        package: None,
        created_at: raw.created_at,
        url: raw.html_url,
    }
}

/// Counts every alert, then keeps the `display_cap` most severe (newest
/// first within a severity).
pub fn rank_alerts(mut alerts: Vec<SecurityAlert>, display_cap: usize) -> (AlertCounts, Vec<SecurityAlert>) {
    let mut counts = AlertCounts {
        total: alerts.len() as u64,
        ..AlertCounts::default()
    };
    for alert in &alerts {
        match alert.severity {
            Severity::Critical => counts.critical += 1,
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
            Severity::Unknown => counts.unknown += 1,
        }
    }

    alerts.sort_by(|a, b| a.severity.cmp(&b.severity).then_with(|| b.created_at.cmp(&a.created_at)));
    alerts.truncate(display_cap);
    (counts, alerts)
}

/// Builds the summary.
pub fn summarize(
    user: RawUser,
    repos: Vec<Enriched<RawRepo, Vec<RawWorkflowRun>>>,
    alerts: Vec<SecurityAlert>,
    alerts_display: usize,
) -> GitHubSummary {
    let mut counts = GitHubCounts {
        repos: repos.len() as u64,
        ..GitHubCounts::default()
    };
    let mut languages: HashMap<String, u64> = HashMap::new();

    let repositories: Vec<RepoRecord> = repos
        .into_iter()
        .map(|enriched| {
            let (repo, runs) = enriched.into_parts();
            if repo.private {
                counts.private_repos += 1;
            } else {
                counts.public_repos += 1;
            }
            counts.stars += repo.stargazers_count;
            counts.forks += repo.forks_count;
            counts.open_issues += repo.open_issues_count;
            if let Some(language) = &repo.language {
                *languages.entry(language.clone()).or_default() += 1;
            }

            let workflow_runs = runs.map(run_records);
            counts.failed_runs += workflow_runs
                .iter()
                .flatten()
                .filter(|run| run.failed())
                .count() as u64;

            RepoRecord {
                full_name: repo.full_name,
                private: repo.private,
                fork: repo.fork,
                archived: repo.archived,
                language: repo.language,
                stars: repo.stargazers_count,
                forks: repo.forks_count,
                open_issues: repo.open_issues_count,
                pushed_at: repo.pushed_at,
                url: repo.html_url,
                workflow_runs,
            }
        })
        .collect();

    let (alert_counts, alerts) = rank_alerts(alerts, alerts_display);
    counts.alerts = alert_counts;

    let mut languages: Vec<LanguageCount> = languages
        .into_iter()
        .map(|(language, repos)| LanguageCount { language, repos })
        .collect();
    languages.sort_by(|a, b| b.repos.cmp(&a.repos).then_with(|| a.language.cmp(&b.language)));

    GitHubSummary {
        summary: counts,
        user: GitHubUser {
            login: user.login,
            name: user.name,
        },
        languages,
        repositories,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alert(severity: Severity, day: u32) -> SecurityAlert {
        SecurityAlert {
            repo: "o/r".to_string(),
            source: AlertSource::Dependabot,
            number: u64::from(day),
            severity,
            summary: None,
            package: None,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            url: None,
        }
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse(Some("CRITICAL")), Severity::Critical);
        assert_eq!(Severity::parse(Some("moderate")), Severity::Medium);
        assert_eq!(Severity::parse(Some("warning")), Severity::Unknown);
        assert_eq!(Severity::parse(None), Severity::Unknown);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
        assert!(Severity::Low < Severity::Unknown);
    }

    #[test]
    fn test_rank_alerts_sorts_then_truncates() {
        let alerts = vec![
            alert(Severity::Low, 20),
            alert(Severity::Critical, 1),
            alert(Severity::High, 5),
            alert(Severity::Critical, 9),
            alert(Severity::Unknown, 28),
        ];
        let (counts, ranked) = rank_alerts(alerts, 3);

        assert_eq!(counts.total, 5);
        assert_eq!(counts.critical, 2);
        assert_eq!(counts.unknown, 1);
        let order: Vec<_> = ranked.iter().map(|a| (a.severity, a.number)).collect();
        assert_eq!(
            order,
            vec![(Severity::Critical, 9), (Severity::Critical, 1), (Severity::High, 5)]
        );
    }

    #[test]
    fn test_rank_alerts_severity_then_newest() {
        let (t0, t1, t2) = (1, 2, 3);
        let alerts = vec![
            alert(Severity::Medium, t1),
            alert(Severity::Critical, t0),
            alert(Severity::High, t2),
            alert(Severity::Critical, t1),
        ];
        let (_, ranked) = rank_alerts(alerts, 20);

        let order: Vec<_> = ranked.iter().map(|a| (a.severity, a.number)).collect();
        assert_eq!(
            order,
            vec![
                (Severity::Critical, u64::from(t1)),
                (Severity::Critical, u64::from(t0)),
                (Severity::High, u64::from(t2)),
                (Severity::Medium, u64::from(t1)),
            ]
        );
    }

    #[test]
    fn test_failed_runs() {
        let run = |conclusion: Option<&str>| RunRecord {
            id: 1,
            name: None,
            status: None,
            conclusion: conclusion.map(str::to_string),
            branch: None,
            event: None,
            created_at: Utc::now(),
            url: None,
        };
        assert!(run(Some("failure")).failed());
        assert!(run(Some("timed_out")).failed());
        assert!(!run(Some("success")).failed());
        assert!(!run(None).failed());
    }

    #[test]
    fn test_alert_serialization() {
        let json = serde_json::to_value(alert(Severity::Medium, 3)).unwrap();
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["source"], "dependabot");
        assert!(json.get("package").is_none());
    }
}
