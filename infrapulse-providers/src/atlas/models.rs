//! MongoDB Atlas normalized summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::api::{RawAlert, RawCluster, RawDatabaseUser, RawFlexCluster, RawGroup, RawProcess};
use crate::normalize::percent_of;

// ============================================================================
// Summary Types
// ============================================================================

/// Normalized Atlas data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasSummary {
    /// Scalar counts.
    pub summary: AtlasCounts,
    /// Every project.
    pub projects: Vec<ProjectReport>,
}

/// Scalar counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasCounts {
    /// Projects.
    pub projects: u64,
    /// Clusters of every kind.
    pub clusters: u64,
    /// Dedicated clusters.
    pub dedicated_clusters: u64,
    /// Shared-tier clusters.
    pub shared_clusters: u64,
    /// Flex clusters.
    pub flex_clusters: u64,
    /// Paused clusters.
    pub paused_clusters: u64,
    /// Database users.
    pub database_users: u64,
    /// Open alerts.
    pub open_alerts: u64,
    /// Current connections across measured clusters.
    pub connections: u64,
    /// Disk bytes used across measured clusters.
    pub disk_used_bytes: u64,
}

/// One project. Sections that failed to load are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    /// Project id.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Dedicated, shared and flex clusters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clusters: Option<Vec<ClusterRecord>>,
    /// Database users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_users: Option<Vec<DatabaseUserRecord>>,
    /// Open alerts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_alerts: Option<Vec<AlertRecord>>,
}

/// A cluster of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    /// Cluster name.
    pub name: String,
    /// Instance size, or `FLEX`.
    pub tier: String,
    /// Cloud provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// State.
    pub state: String,
    /// Paused flag.
    pub paused: bool,
    /// Shared-tier (M0/M2/M5) cluster.
    pub shared: bool,
    /// Flex cluster.
    pub flex: bool,
    /// Electable nodes.
    pub replication_factor: u32,
    /// Server version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mongo_version: Option<String>,
    /// Process metrics, for measured clusters only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ClusterMetrics>,
}

/// Process metrics for one cluster. Each part is fetched independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetrics {
    /// Host the metrics were read from.
    pub process: String,
    /// Current connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections: Option<u64>,
    /// First partition usage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<DiskUsage>,
    /// Data size per database, largest first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub databases: Option<Vec<DatabaseSize>>,
}

/// Disk partition usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsage {
    /// Partition name.
    pub partition: String,
    /// Bytes used.
    pub used_bytes: u64,
    /// Bytes free.
    pub free_bytes: u64,
    /// Used share, percent.
    pub percent_used: f64,
}

/// Data size of one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSize {
    /// Database name.
    pub name: String,
    /// Data bytes.
    pub data_size_bytes: u64,
}

/// A database user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUserRecord {
    /// User name.
    pub username: String,
    /// Authentication database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_database: Option<String>,
    /// `role@database` entries.
    pub roles: Vec<String>,
}

/// An open alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    /// Alert id.
    pub id: String,
    /// Event type.
    pub event_type: String,
    /// Status.
    pub status: String,
    /// Affected cluster.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    /// Affected metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Normalization
// ============================================================================

const SHARED_TIERS: [&str; 3] = ["M0", "M2", "M5"];

/// Maps a dedicated or shared-tier cluster.
pub fn cluster_record(raw: RawCluster) -> ClusterRecord {
    let regions: Vec<_> = raw
        .replication_specs
        .iter()
        .flat_map(|spec| &spec.region_configs)
        .collect();
    let first = regions.first();

    let tier = first
        .and_then(|r| r.electable_specs.as_ref())
        .and_then(|s| s.instance_size.clone())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let tenant = first.is_some_and(|r| r.provider_name == "TENANT");
    let provider = first.map(|r| {
        if tenant {
            r.backing_provider_name.clone().unwrap_or_else(|| r.provider_name.clone())
        } else {
            r.provider_name.clone()
        }
    });
    let nodes: u32 = regions
        .iter()
        .filter_map(|r| r.electable_specs.as_ref()?.node_count)
        .sum();

    ClusterRecord {
        shared: tenant || SHARED_TIERS.contains(&tier.as_str()),
        name: raw.name,
        tier,
        provider,
        region: first.and_then(|r| r.region_name.clone()),
        state: raw.state_name,
        paused: raw.paused,
        flex: false,
        replication_factor: if nodes == 0 { 3 } else { nodes },
        mongo_version: raw.mongo_version,
        metrics: None,
    }
}

/// Maps a flex cluster onto the common record.
pub fn flex_cluster_record(raw: RawFlexCluster) -> ClusterRecord {
    let settings = raw.provider_settings.unwrap_or_default();
    ClusterRecord {
        name: raw.name,
        tier: "FLEX".to_string(),
        provider: settings.backing_provider_name,
        region: settings.region_name,
        state: raw.state_name,
        paused: false,
        shared: false,
        flex: true,
        replication_factor: 3,
        mongo_version: raw.mongo_version,
        metrics: None,
    }
}

/// Whether process metrics are fetched for a cluster.
///
/// Shared-tier and flex clusters expose no process measurements.
pub fn metrics_eligible(cluster: &ClusterRecord) -> bool {
    !cluster.paused && cluster.state == "IDLE" && !cluster.shared && !cluster.flex
}

/// Picks the process to measure for a cluster: the primary if present,
/// else any member whose host name starts with the cluster name.
pub fn select_process<'a>(processes: &'a [RawProcess], cluster: &str) -> Option<&'a RawProcess> {
    let prefix = format!("{}-", cluster.to_ascii_lowercase());
    let mut members = processes
        .iter()
        .filter(|p| p.hostname.to_ascii_lowercase().starts_with(&prefix));
    let first = members.clone().next();
    members.find(|p| p.type_name == "REPLICA_PRIMARY").or(first)
}

/// Builds disk usage from used and free bytes.
pub fn disk_usage(partition: String, used_bytes: u64, free_bytes: u64) -> DiskUsage {
    DiskUsage {
        partition,
        used_bytes,
        free_bytes,
        percent_used: percent_of(used_bytes, used_bytes + free_bytes),
    }
}

/// Maps a database user.
pub fn user_record(raw: RawDatabaseUser) -> DatabaseUserRecord {
    DatabaseUserRecord {
        username: raw.username,
        auth_database: raw.database_name,
        roles: raw
            .roles
            .into_iter()
            .map(|r| match r.database_name {
                Some(db) => format!("{}@{db}", r.role_name),
                None => r.role_name,
            })
            .collect(),
    }
}

/// Maps an alert.
pub fn alert_record(raw: RawAlert) -> AlertRecord {
    AlertRecord {
        id: raw.id,
        event_type: raw.event_type_name,
        status: raw.status,
        cluster: raw.cluster_name,
        metric: raw.metric_name,
        created_at: raw.created,
    }
}

/// Starts a project report; sections are filled in by the fetcher.
pub fn project_report(group: RawGroup) -> ProjectReport {
    ProjectReport {
        id: group.id,
        name: group.name,
        created_at: group.created,
        clusters: None,
        database_users: None,
        open_alerts: None,
    }
}

/// Totals the project reports.
pub fn summarize(projects: Vec<ProjectReport>) -> AtlasSummary {
    let mut counts = AtlasCounts {
        projects: projects.len() as u64,
        ..AtlasCounts::default()
    };

    for project in &projects {
        for cluster in project.clusters.iter().flatten() {
            counts.clusters += 1;
            if cluster.flex {
                counts.flex_clusters += 1;
            } else if cluster.shared {
                counts.shared_clusters += 1;
            } else {
                counts.dedicated_clusters += 1;
            }
            if cluster.paused {
                counts.paused_clusters += 1;
            }
            if let Some(metrics) = &cluster.metrics {
                counts.connections += metrics.connections.unwrap_or(0);
                counts.disk_used_bytes += metrics.disk.as_ref().map_or(0, |d| d.used_bytes);
            }
        }
        counts.database_users += project.database_users.as_ref().map_or(0, Vec::len) as u64;
        counts.open_alerts += project.open_alerts.as_ref().map_or(0, Vec::len) as u64;
    }

    AtlasSummary {
        summary: counts,
        projects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::api::{RawHardwareSpec, RawRegionConfig, RawReplicationSpec};

    fn raw_cluster(name: &str, provider: &str, size: &str, state: &str, paused: bool) -> RawCluster {
        RawCluster {
            name: name.to_string(),
            state_name: state.to_string(),
            paused,
            cluster_type: Some("REPLICASET".to_string()),
            mongo_version: Some("7.0".to_string()),
            replication_specs: vec![RawReplicationSpec {
                region_configs: vec![RawRegionConfig {
                    provider_name: provider.to_string(),
                    backing_provider_name: Some("AWS".to_string()),
                    region_name: Some("US_EAST_1".to_string()),
                    electable_specs: Some(RawHardwareSpec {
                        instance_size: Some(size.to_string()),
                        node_count: Some(3),
                    }),
                }],
            }],
        }
    }

    fn process(hostname: &str, type_name: &str) -> RawProcess {
        RawProcess {
            id: format!("{hostname}:27017"),
            hostname: hostname.to_string(),
            type_name: type_name.to_string(),
            user_alias: None,
        }
    }

    #[test]
    fn test_shared_detection() {
        let tenant = cluster_record(raw_cluster("free", "TENANT", "M0", "IDLE", false));
        assert!(tenant.shared);
        assert_eq!(tenant.provider.as_deref(), Some("AWS"));
        assert!(!metrics_eligible(&tenant));

        let m5 = cluster_record(raw_cluster("small", "AWS", "M5", "IDLE", false));
        assert!(m5.shared);

        let dedicated = cluster_record(raw_cluster("prod", "AWS", "M10", "IDLE", false));
        assert!(!dedicated.shared);
        assert_eq!(dedicated.replication_factor, 3);
        assert!(metrics_eligible(&dedicated));
    }

    #[test]
    fn test_eligibility_requires_idle_and_running() {
        let paused = cluster_record(raw_cluster("prod", "AWS", "M10", "IDLE", true));
        assert!(!metrics_eligible(&paused));
        let updating = cluster_record(raw_cluster("prod", "AWS", "M10", "UPDATING", false));
        assert!(!metrics_eligible(&updating));
    }

    #[test]
    fn test_flex_sentinels() {
        let flex = flex_cluster_record(RawFlexCluster {
            name: "flexy".to_string(),
            state_name: "IDLE".to_string(),
            mongo_version: None,
            provider_settings: None,
        });
        assert_eq!(flex.tier, "FLEX");
        assert_eq!(flex.replication_factor, 3);
        assert!(flex.flex && !flex.shared && !flex.paused);
        assert!(!metrics_eligible(&flex));
    }

    #[test]
    fn test_select_process_prefers_primary() {
        let processes = vec![
            process("other-shard-00-00.abc.mongodb.net", "REPLICA_PRIMARY"),
            process("prod-shard-00-00.abc.mongodb.net", "REPLICA_SECONDARY"),
            process("prod-shard-00-01.abc.mongodb.net", "REPLICA_PRIMARY"),
        ];
        let selected = select_process(&processes, "Prod").unwrap();
        assert_eq!(selected.hostname, "prod-shard-00-01.abc.mongodb.net");

        let secondaries = &processes[1..2];
        assert_eq!(
            select_process(secondaries, "prod").unwrap().type_name,
            "REPLICA_SECONDARY"
        );
        assert!(select_process(&processes, "missing").is_none());
    }

    #[test]
    fn test_disk_usage_percent() {
        let disk = disk_usage("data".to_string(), 250, 750);
        assert_eq!(disk.percent_used, 25.0);
    }

    #[test]
    fn test_summarize_counts_kinds() {
        let mut dedicated = cluster_record(raw_cluster("prod", "AWS", "M10", "IDLE", false));
        dedicated.metrics = Some(ClusterMetrics {
            process: "prod-shard-00-00:27017".to_string(),
            connections: Some(42),
            disk: Some(disk_usage("data".to_string(), 1000, 9000)),
            databases: None,
        });
        let shared = cluster_record(raw_cluster("free", "TENANT", "M0", "IDLE", false));
        let paused = cluster_record(raw_cluster("old", "AWS", "M10", "IDLE", true));

        let project = ProjectReport {
            id: "g1".to_string(),
            name: "Main".to_string(),
            created_at: None,
            clusters: Some(vec![dedicated, shared, paused]),
            database_users: Some(Vec::new()),
            open_alerts: None,
        };
        let summary = summarize(vec![project]);
        let counts = summary.summary;
        assert_eq!(counts.clusters, 3);
        assert_eq!(counts.dedicated_clusters, 2);
        assert_eq!(counts.shared_clusters, 1);
        assert_eq!(counts.paused_clusters, 1);
        assert_eq!(counts.connections, 42);
        assert_eq!(counts.disk_used_bytes, 1000);
    }
}
