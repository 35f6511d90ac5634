//! Vercel REST API schemas.

use serde::Deserialize;

/// Vercel API base URL.
pub const VERCEL_API_BASE: &str = "https://api.vercel.com";

/// Projects requested per page.
pub const PROJECTS_PAGE_LIMIT: u32 = 100;

/// Latest deployments fetched per account.
pub const DEPLOYMENTS_LIMIT: u32 = 20;

/// `GET /v9/projects` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectsResponse {
    /// Projects on this page.
    #[serde(default)]
    pub projects: Vec<RawProject>,
    /// Pagination cursors.
    #[serde(default)]
    pub pagination: Option<RawPagination>,
}

/// Pagination block. `next` is a millisecond timestamp passed back as `until`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPagination {
    /// Items on this page.
    #[serde(default)]
    pub count: u64,
    /// Cursor for the next page.
    #[serde(default)]
    pub next: Option<i64>,
}

/// A project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    /// Project id.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Detected framework.
    #[serde(default)]
    pub framework: Option<String>,
    /// Last update, epoch milliseconds.
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// `GET /v6/deployments` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDeploymentsResponse {
    /// Deployments, newest first.
    #[serde(default)]
    pub deployments: Vec<RawDeployment>,
}

/// A deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeployment {
    /// Deployment id.
    pub uid: String,
    /// Project name.
    pub name: String,
    /// Deployment hostname, without scheme.
    #[serde(default)]
    pub url: Option<String>,
    /// `READY`, `ERROR`, `BUILDING`, ...
    #[serde(default)]
    pub state: Option<String>,
    /// Older field carrying the same value as `state`.
    #[serde(default)]
    pub ready_state: Option<String>,
    /// `production` or `null` for previews.
    #[serde(default)]
    pub target: Option<String>,
    /// Creation time, epoch milliseconds.
    #[serde(default)]
    pub created: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_projects_page() {
        let json = r#"{
            "projects": [{"id": "prj_1", "name": "web", "framework": "nextjs", "updatedAt": 1714564800000}],
            "pagination": {"count": 1, "next": 1714564700000, "prev": null}
        }"#;
        let page: RawProjectsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.projects[0].framework.as_deref(), Some("nextjs"));
        assert_eq!(page.pagination.unwrap().next, Some(1_714_564_700_000));
    }

    #[test]
    fn test_parse_deployment_ready_state() {
        let json = r#"{"deployments": [{"uid": "dpl_1", "name": "web", "url": "web-abc.vercel.app",
            "readyState": "READY", "target": null, "created": 1714564800000}]}"#;
        let resp: RawDeploymentsResponse = serde_json::from_str(json).unwrap();
        let deployment = &resp.deployments[0];
        assert!(deployment.state.is_none());
        assert_eq!(deployment.ready_state.as_deref(), Some("READY"));
    }
}
