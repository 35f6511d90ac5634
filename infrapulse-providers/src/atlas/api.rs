//! MongoDB Atlas Admin API v2 schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// Constants
// ============================================================================

/// Atlas Admin API base URL.
pub const ATLAS_API_BASE: &str = "https://cloud.mongodb.com/api/atlas/v2";

/// Versioned media type for most resources.
pub const ATLAS_ACCEPT: &str = "application/vnd.atlas.2023-02-01+json";

/// Versioned media type for flex clusters.
pub const ATLAS_FLEX_ACCEPT: &str = "application/vnd.atlas.2024-11-13+json";

/// Projects requested per page.
pub const ITEMS_PER_PAGE: u32 = 100;

/// Measurement granularity.
pub const GRANULARITY: &str = "PT1M";

/// Measurement window.
pub const PERIOD: &str = "PT5M";

// ============================================================================
// Envelopes and Resources
// ============================================================================

/// Paginated list envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPage<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Items across all pages.
    #[serde(default)]
    pub total_count: u64,
}

/// A project (group).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGroup {
    /// Project id.
    pub id: String,
    /// Project name.
    pub name: String,
    /// Clusters in the project.
    #[serde(default)]
    pub cluster_count: u64,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// A dedicated or shared-tier cluster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCluster {
    /// Cluster name.
    pub name: String,
    /// `IDLE`, `CREATING`, `UPDATING`, ...
    #[serde(default)]
    pub state_name: String,
    /// Paused flag.
    #[serde(default)]
    pub paused: bool,
    /// `REPLICASET`, `SHARDED`, `GEOSHARDED`.
    #[serde(default)]
    pub cluster_type: Option<String>,
    /// Server version.
    #[serde(default, rename = "mongoDBVersion")]
    pub mongo_version: Option<String>,
    /// Topology.
    #[serde(default)]
    pub replication_specs: Vec<RawReplicationSpec>,
}

/// One shard's replication layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReplicationSpec {
    /// Per-region node configuration.
    #[serde(default)]
    pub region_configs: Vec<RawRegionConfig>,
}

/// Nodes in one region.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRegionConfig {
    /// `AWS`, `GCP`, `AZURE` or `TENANT`.
    #[serde(default)]
    pub provider_name: String,
    /// Cloud provider behind a `TENANT` cluster.
    #[serde(default)]
    pub backing_provider_name: Option<String>,
    /// Region.
    #[serde(default)]
    pub region_name: Option<String>,
    /// Electable node hardware.
    #[serde(default)]
    pub electable_specs: Option<RawHardwareSpec>,
}

/// Node hardware.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHardwareSpec {
    /// `M10`, `M0`, ...
    #[serde(default)]
    pub instance_size: Option<String>,
    /// Electable nodes.
    #[serde(default)]
    pub node_count: Option<u32>,
}

/// A flex cluster. Different endpoint and shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlexCluster {
    /// Cluster name.
    pub name: String,
    /// State.
    #[serde(default)]
    pub state_name: String,
    /// Server version.
    #[serde(default, rename = "mongoDBVersion")]
    pub mongo_version: Option<String>,
    /// Backing cloud.
    #[serde(default)]
    pub provider_settings: Option<RawFlexProviderSettings>,
}

/// Flex cluster cloud placement.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFlexProviderSettings {
    /// Cloud provider.
    #[serde(default)]
    pub backing_provider_name: Option<String>,
    /// Region.
    #[serde(default)]
    pub region_name: Option<String>,
}

/// A database user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDatabaseUser {
    /// User name.
    pub username: String,
    /// Authentication database.
    #[serde(default)]
    pub database_name: Option<String>,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<RawRole>,
}

/// A granted role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRole {
    /// Role.
    pub role_name: String,
    /// Database the role applies to.
    #[serde(default)]
    pub database_name: Option<String>,
}

/// An alert.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAlert {
    /// Alert id.
    pub id: String,
    /// Event type.
    #[serde(default)]
    pub event_type_name: String,
    /// `OPEN`, `TRACKING`, `CLOSED`.
    #[serde(default)]
    pub status: String,
    /// Creation time.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Affected cluster.
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Affected metric.
    #[serde(default)]
    pub metric_name: Option<String>,
}

/// A mongod/mongos process.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProcess {
    /// `hostname:port`.
    pub id: String,
    /// Host name.
    #[serde(default)]
    pub hostname: String,
    /// `REPLICA_PRIMARY`, `REPLICA_SECONDARY`, ...
    #[serde(default)]
    pub type_name: String,
    /// Human-facing host alias.
    #[serde(default)]
    pub user_alias: Option<String>,
}

/// A disk partition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDisk {
    /// Partition name.
    pub partition_name: String,
}

/// A database on a process.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDatabase {
    /// Database name.
    pub database_name: String,
}

/// Measurements response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMeasurements {
    /// One series per requested metric.
    #[serde(default)]
    pub measurements: Vec<RawMeasurement>,
}

/// One metric series.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeasurement {
    /// Metric name.
    pub name: String,
    /// Data points, oldest first.
    #[serde(default)]
    pub data_points: Vec<RawDataPoint>,
}

/// A data point. `value` is null while the window is still filling.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDataPoint {
    /// Sample time.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Sample value.
    #[serde(default)]
    pub value: Option<f64>,
}

impl RawMeasurements {
    /// Latest non-null value of a metric.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.measurements
            .iter()
            .find(|m| m.name == name)?
            .data_points
            .iter()
            .rev()
            .find_map(|p| p.value)
    }
}
