//! Sentry API schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::normalize::flexible_u64;

/// Sentry API base URL.
pub const SENTRY_API_BASE: &str = "https://sentry.io/api/0";

/// Issues requested (first page only).
pub const ISSUES_LIMIT: u32 = 100;

/// A project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    /// Project id.
    pub id: String,
    /// Slug.
    pub slug: String,
    /// Name.
    pub name: String,
    /// Platform.
    #[serde(default)]
    pub platform: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
}

/// An issue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawIssue {
    /// Issue id.
    pub id: String,
    /// `PROJECT-1A`.
    #[serde(default)]
    pub short_id: Option<String>,
    /// Title.
    pub title: String,
    /// Culprit.
    #[serde(default)]
    pub culprit: Option<String>,
    /// `fatal`, `error`, `warning`, `info`, `debug`.
    #[serde(default)]
    pub level: Option<String>,
    /// Events in the stats period. Sent as a string.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub count: u64,
    /// Affected users.
    #[serde(default)]
    pub user_count: u64,
    /// First occurrence.
    #[serde(default)]
    pub first_seen: Option<DateTime<Utc>>,
    /// Last occurrence.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    /// Web URL.
    #[serde(default)]
    pub permalink: Option<String>,
    /// Owning project.
    #[serde(default)]
    pub project: Option<RawIssueProject>,
}

/// Project reference inside an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssueProject {
    /// Slug.
    pub slug: String,
}

/// A `[timestamp, count]` stats bucket.
pub type RawStatPoint = (i64, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_issue_string_count() {
        let json = r#"{
            "id": "42",
            "shortId": "API-1A",
            "title": "TypeError: x is undefined",
            "culprit": "app/handlers.js",
            "level": "error",
            "count": "1532",
            "userCount": 87,
            "firstSeen": "2024-04-30T08:00:00Z",
            "lastSeen": "2024-05-01T08:00:00.123Z",
            "project": {"id": "1", "slug": "api", "name": "API"}
        }"#;
        let issue: RawIssue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.count, 1532);
        assert_eq!(issue.user_count, 87);
        assert_eq!(issue.project.unwrap().slug, "api");
    }

    #[test]
    fn test_parse_stats() {
        let points: Vec<RawStatPoint> = serde_json::from_str("[[1714521600, 10], [1714525200, 4.0]]").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].1, 4.0);
    }
}
