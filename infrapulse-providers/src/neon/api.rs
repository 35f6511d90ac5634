//! Neon API v2 schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Neon API base URL.
pub const NEON_API_BASE: &str = "https://console.neon.tech/api/v2";

/// Projects requested per page.
pub const PROJECTS_PAGE_LIMIT: u32 = 100;

/// `GET /projects` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProjectsResponse {
    /// Projects on this page.
    #[serde(default)]
    pub projects: Vec<RawProject>,
    /// Cursor block.
    #[serde(default)]
    pub pagination: Option<RawPagination>,
}

/// Cursor block.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPagination {
    /// Cursor for the next page; repeats the last one when exhausted.
    #[serde(default)]
    pub cursor: Option<String>,
}

/// A project.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProject {
    /// Project id.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Region id.
    #[serde(default)]
    pub region_id: Option<String>,
    /// Postgres major version.
    #[serde(default)]
    pub pg_version: Option<u32>,
    /// Logical storage in bytes.
    #[serde(default)]
    pub synthetic_storage_size: Option<u64>,
    /// Compute seconds this billing period.
    #[serde(default)]
    pub compute_time_seconds: u64,
    /// Active seconds this billing period.
    #[serde(default)]
    pub active_time_seconds: u64,
    /// Egress bytes this billing period.
    #[serde(default)]
    pub data_transfer_bytes: u64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /projects/{id}/branches` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBranchesResponse {
    /// Branches.
    #[serde(default)]
    pub branches: Vec<RawBranch>,
}

/// A branch.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBranch {
    /// Branch id.
    pub id: String,
    /// Branch name.
    pub name: String,
    /// Default branch flag.
    #[serde(default)]
    pub default: bool,
    /// Logical size in bytes.
    #[serde(default)]
    pub logical_size: Option<u64>,
    /// `ready`, `init`, ...
    #[serde(default)]
    pub current_state: Option<String>,
}

/// `GET /projects/{id}/endpoints` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEndpointsResponse {
    /// Compute endpoints.
    #[serde(default)]
    pub endpoints: Vec<RawEndpoint>,
}

/// A compute endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEndpoint {
    /// Endpoint id.
    pub id: String,
    /// Branch it serves.
    #[serde(default)]
    pub branch_id: Option<String>,
    /// `read_write` or `read_only`.
    #[serde(rename = "type", default)]
    pub endpoint_type: Option<String>,
    /// `active`, `idle`, `init`.
    #[serde(default)]
    pub current_state: String,
    /// Minimum autoscaling size.
    #[serde(default)]
    pub autoscaling_limit_min_cu: Option<f64>,
    /// Maximum autoscaling size.
    #[serde(default)]
    pub autoscaling_limit_max_cu: Option<f64>,
}
