//! Neon normalized summary.

use chrono::{DateTime, Utc};
use infrapulse_fetch::Enriched;
use serde::Serialize;

use super::api::{RawBranch, RawEndpoint, RawProject};

/// Normalized Neon data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeonSummary {
    /// Scalar counts.
    pub summary: NeonCounts,
    /// Every project, most recently updated first.
    pub projects: Vec<NeonProject>,
}

/// Scalar counts. Branch and endpoint counts cover the enriched projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeonCounts {
    /// Projects.
    pub projects: u64,
    /// Logical storage bytes.
    pub storage_bytes: u64,
    /// Compute seconds this period.
    pub compute_seconds: u64,
    /// Active seconds this period.
    pub active_seconds: u64,
    /// Egress bytes this period.
    pub data_transfer_bytes: u64,
    /// Branches.
    pub branches: u64,
    /// Endpoints currently running.
    pub active_endpoints: u64,
    /// Endpoints suspended.
    pub idle_endpoints: u64,
}

/// A project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeonProject {
    /// Project id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Postgres version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pg_version: Option<u32>,
    /// Logical storage bytes.
    pub storage_bytes: u64,
    /// Compute seconds this period.
    pub compute_seconds: u64,
    /// Egress bytes this period.
    pub data_transfer_bytes: u64,
    /// Last update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Branches and endpoints, for enriched projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<NeonProjectDetail>,
}

/// Branches and endpoints of one project. Each part is fetched independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeonProjectDetail {
    /// Branches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<BranchRecord>>,
    /// Compute endpoints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Vec<EndpointRecord>>,
}

/// A branch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    /// Branch id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Default branch flag.
    pub default: bool,
    /// Logical size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_size_bytes: Option<u64>,
    /// State.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A compute endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    /// Endpoint id.
    pub id: String,
    /// Served branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    /// `read_write` or `read_only`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_type: Option<String>,
    /// `active`, `idle`, ...
    pub state: String,
    /// Autoscaling range in compute units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cu: Option<f64>,
    /// Autoscaling range in compute units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cu: Option<f64>,
}

/// Orders projects most recently updated first.
pub fn sort_projects(projects: &mut [RawProject]) {
    projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
}

/// Builds a project's detail.
pub fn project_detail(
    branches: Option<Vec<RawBranch>>,
    endpoints: Option<Vec<RawEndpoint>>,
) -> NeonProjectDetail {
    NeonProjectDetail {
        branches: branches.map(|branches| {
            branches
                .into_iter()
                .map(|b| BranchRecord {
                    id: b.id,
                    name: b.name,
                    default: b.default,
                    logical_size_bytes: b.logical_size,
                    state: b.current_state,
                })
                .collect()
        }),
        endpoints: endpoints.map(|endpoints| {
            endpoints
                .into_iter()
                .map(|e| EndpointRecord {
                    id: e.id,
                    branch_id: e.branch_id,
                    endpoint_type: e.endpoint_type,
                    state: e.current_state,
                    min_cu: e.autoscaling_limit_min_cu,
                    max_cu: e.autoscaling_limit_max_cu,
                })
                .collect()
        }),
    }
}

/// Totals enriched projects.
pub fn summarize(projects: Vec<Enriched<RawProject, NeonProjectDetail>>) -> NeonSummary {
    let mut counts = NeonCounts {
        projects: projects.len() as u64,
        ..NeonCounts::default()
    };

    let projects = projects
        .into_iter()
        .map(|enriched| {
            let (project, detail) = enriched.into_parts();
            let storage_bytes = project.synthetic_storage_size.unwrap_or(0);
            counts.storage_bytes += storage_bytes;
            counts.compute_seconds += project.compute_time_seconds;
            counts.active_seconds += project.active_time_seconds;
            counts.data_transfer_bytes += project.data_transfer_bytes;

            if let Some(detail) = &detail {
                counts.branches += detail.branches.as_ref().map_or(0, Vec::len) as u64;
                for endpoint in detail.endpoints.iter().flatten() {
                    match endpoint.state.as_str() {
                        "active" => counts.active_endpoints += 1,
                        "idle" => counts.idle_endpoints += 1,
                        _ => {}
                    }
                }
            }

            NeonProject {
                id: project.id,
                name: project.name,
                region: project.region_id,
                pg_version: project.pg_version,
                storage_bytes,
                compute_seconds: project.compute_time_seconds,
                data_transfer_bytes: project.data_transfer_bytes,
                updated_at: project.updated_at,
                detail,
            }
        })
        .collect();

    NeonSummary {
        summary: counts,
        projects,
    }
}
