//! Cloudflare API schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::normalize::flexible_u64;

// ============================================================================
// Constants
// ============================================================================

/// Cloudflare API base URL.
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Zones requested per page.
pub const ZONES_PER_PAGE: u32 = 50;

/// Hourly HTTP analytics for one zone over a time window.
pub const ZONE_ANALYTICS_QUERY: &str = "query ZoneAnalytics($zoneTag: string, $since: Time!, $until: Time!) { \
viewer { zones(filter: { zoneTag: $zoneTag }) { \
httpRequests1hGroups(limit: 24, filter: { datetime_geq: $since, datetime_lt: $until }) { \
sum { requests bytes cachedRequests threats } } } } }";

// ============================================================================
// Envelope
// ============================================================================

/// Standard v4 response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the call succeeded.
    #[serde(default)]
    pub success: bool,
    /// Error messages.
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    /// Payload.
    pub result: Option<T>,
    /// Pagination info.
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// An error or message entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    /// Numeric code.
    #[serde(default)]
    pub code: i64,
    /// Text.
    #[serde(default)]
    pub message: String,
}

/// Pagination info.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultInfo {
    /// Current page.
    #[serde(default)]
    pub page: u32,
    /// Total pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total items across pages.
    #[serde(default)]
    pub total_count: u64,
}

// ============================================================================
// Resources
// ============================================================================

/// A DNS zone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawZone {
    /// Zone id.
    pub id: String,
    /// Domain name.
    pub name: String,
    /// `active`, `pending`, ...
    pub status: String,
    /// Whether Cloudflare is paused for the zone.
    #[serde(default)]
    pub paused: bool,
    /// Plan.
    #[serde(default)]
    pub plan: Option<RawPlan>,
    /// Last modification.
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

/// A zone plan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPlan {
    /// Plan name.
    #[serde(default)]
    pub name: String,
}

/// An SSL certificate pack.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCertificatePack {
    /// Pack status.
    #[serde(default)]
    pub status: String,
    /// Certificates in the pack.
    #[serde(default)]
    pub certificates: Vec<RawCertificate>,
}

/// A certificate inside a pack.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCertificate {
    /// Expiry time.
    #[serde(default)]
    pub expires_on: Option<DateTime<Utc>>,
}

/// A Workers script.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkerScript {
    /// Script name.
    pub id: String,
    /// Creation time.
    #[serde(default)]
    pub created_on: Option<DateTime<Utc>>,
    /// Last modification.
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

/// R2 bucket listing payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBucketList {
    /// Buckets.
    #[serde(default)]
    pub buckets: Vec<RawBucket>,
}

/// An R2 bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBucket {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    /// Location hint.
    #[serde(default)]
    pub location: Option<String>,
}

/// R2 bucket usage. Sizes arrive as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBucketUsage {
    /// Stored payload bytes.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub payload_size: u64,
    /// Object count.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub object_count: u64,
}

// ============================================================================
// GraphQL Analytics
// ============================================================================

/// GraphQL response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGraphqlResponse {
    /// Data, absent on failure.
    #[serde(default)]
    pub data: Option<RawGraphqlData>,
    /// Errors, if any.
    #[serde(default)]
    pub errors: Option<Vec<ApiMessage>>,
}

/// GraphQL data root.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGraphqlData {
    /// Viewer scope.
    pub viewer: RawViewer,
}

/// Viewer scope.
#[derive(Debug, Clone, Deserialize)]
pub struct RawViewer {
    /// Matched zones.
    #[serde(default)]
    pub zones: Vec<RawZoneAnalytics>,
}

/// Analytics groups for one zone.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawZoneAnalytics {
    /// Hourly groups.
    #[serde(default, rename = "httpRequests1hGroups")]
    pub http_requests_1h_groups: Vec<RawRequestGroup>,
}

/// One hourly group.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRequestGroup {
    /// Sums over the hour.
    pub sum: RawRequestSum,
}

/// Summed counters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequestSum {
    /// Requests.
    #[serde(default)]
    pub requests: u64,
    /// Bytes served.
    #[serde(default)]
    pub bytes: u64,
    /// Requests served from cache.
    #[serde(default)]
    pub cached_requests: u64,
    /// Threats blocked.
    #[serde(default)]
    pub threats: u64,
}
