//! Sentry normalized summary.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use infrapulse_fetch::Enriched;
use serde::Serialize;

use super::api::{RawIssue, RawProject, RawStatPoint};

/// Normalized Sentry data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentrySummary {
    /// Scalar counts.
    pub summary: SentryCounts,
    /// Every project, in upstream order.
    pub projects: Vec<ProjectRecord>,
    /// Unresolved issues seen in the last 24h, in upstream order.
    pub issues: Vec<IssueRecord>,
}

/// Scalar counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentryCounts {
    /// Projects.
    pub projects: u64,
    /// Unresolved issues.
    pub unresolved_issues: u64,
    /// Received events over 24h across the measured projects.
    #[serde(rename = "events24h")]
    pub events_24h: u64,
    /// Issue counts per level.
    pub issues_by_level: BTreeMap<String, u64>,
}

/// A project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    /// Slug.
    pub slug: String,
    /// Name.
    pub name: String,
    /// Platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Received events over 24h, for the measured projects.
    #[serde(rename = "events24h", skip_serializing_if = "Option::is_none")]
    pub events_24h: Option<u64>,
}

/// An issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    /// Issue id.
    pub id: String,
    /// Short id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
    /// Title.
    pub title: String,
    /// Culprit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culprit: Option<String>,
    /// Level.
    pub level: String,
    /// Project slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Events.
    pub events: u64,
    /// Affected users.
    pub users: u64,
    /// Last occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    /// Web URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Sums a stats series.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sum_stats(points: &[RawStatPoint]) -> u64 {
    points.iter().map(|(_, count)| count.max(0.0).round() as u64).sum()
}

/// Builds the summary.
pub fn summarize(projects: Vec<Enriched<RawProject, u64>>, issues: Vec<RawIssue>) -> SentrySummary {
    let mut counts = SentryCounts {
        projects: projects.len() as u64,
        unresolved_issues: issues.len() as u64,
        ..SentryCounts::default()
    };

    let projects = projects
        .into_iter()
        .map(|enriched| {
            let (project, events) = enriched.into_parts();
            counts.events_24h += events.unwrap_or(0);
            ProjectRecord {
                slug: project.slug,
                name: project.name,
                platform: project.platform,
                events_24h: events,
            }
        })
        .collect();

    let issues = issues
        .into_iter()
        .map(|issue| {
            let level = issue.level.unwrap_or_else(|| "unknown".to_string());
            *counts.issues_by_level.entry(level.clone()).or_default() += 1;
            IssueRecord {
                id: issue.id,
                short_id: issue.short_id,
                title: issue.title,
                culprit: issue.culprit,
                level,
                project: issue.project.map(|p| p.slug),
                events: issue.count,
                users: issue.user_count,
                last_seen: issue.last_seen,
                url: issue.permalink,
            }
        })
        .collect();

    SentrySummary {
        summary: counts,
        projects,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(slug: &str) -> RawProject {
        RawProject {
            id: slug.to_string(),
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            platform: Some("python".to_string()),
            date_created: None,
        }
    }

    fn issue(id: &str, level: Option<&str>) -> RawIssue {
        RawIssue {
            id: id.to_string(),
            short_id: None,
            title: "boom".to_string(),
            culprit: None,
            level: level.map(str::to_string),
            count: 3,
            user_count: 1,
            first_seen: None,
            last_seen: None,
            permalink: None,
            project: None,
        }
    }

    #[test]
    fn test_sum_stats() {
        assert_eq!(sum_stats(&[(0, 10.0), (3600, 4.0), (7200, 0.0)]), 14);
        assert_eq!(sum_stats(&[]), 0);
    }

    #[test]
    fn test_summarize() {
        let projects = vec![
            Enriched { item: project("api"), detail: Some(120) },
            Enriched { item: project("web"), detail: None },
        ];
        let issues = vec![issue("1", Some("error")), issue("2", Some("error")), issue("3", None)];

        let summary = summarize(projects, issues);
        assert_eq!(summary.summary.projects, 2);
        assert_eq!(summary.summary.unresolved_issues, 3);
        assert_eq!(summary.summary.events_24h, 120);
        assert_eq!(summary.summary.issues_by_level["error"], 2);
        assert_eq!(summary.summary.issues_by_level["unknown"], 1);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["projects"][0]["events24h"], 120);
        assert!(json["projects"][1].get("events24h").is_none());
    }
}
