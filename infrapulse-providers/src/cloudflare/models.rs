//! Cloudflare normalized summary.

use chrono::{DateTime, Utc};
use infrapulse_fetch::Enriched;
use serde::Serialize;

use super::api::{RawBucket, RawBucketUsage, RawCertificatePack, RawRequestGroup, RawWorkerScript, RawZone};
use crate::normalize::percent_of;

// ============================================================================
// Summary Types
// ============================================================================

/// Normalized Cloudflare data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudflareSummary {
    /// Scalar counts.
    pub summary: CloudflareCounts,
    /// Every zone, most recently modified first.
    pub zones: Vec<ZoneRecord>,
    /// Workers scripts; absent without an account id or on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<Vec<WorkerRecord>>,
    /// R2 buckets; absent without an account id or on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r2_buckets: Option<Vec<BucketRecord>>,
}

/// Scalar counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudflareCounts {
    /// All zones.
    pub total_zones: u64,
    /// Zones with status `active`.
    pub active_zones: u64,
    /// Zones paused in Cloudflare.
    pub paused_zones: u64,
    /// DNS records across enriched zones.
    pub dns_records: u64,
    /// Requests in the last 24h across enriched zones.
    #[serde(rename = "requests24h")]
    pub requests_24h: u64,
    /// Bytes served in the last 24h across enriched zones.
    #[serde(rename = "bandwidth24h")]
    pub bandwidth_24h: u64,
    /// Threats blocked in the last 24h across enriched zones.
    #[serde(rename = "threats24h")]
    pub threats_24h: u64,
    /// Workers scripts.
    pub workers: u64,
    /// R2 buckets.
    pub buckets: u64,
    /// R2 bytes across enriched buckets.
    pub r2_bytes: u64,
    /// R2 objects across enriched buckets.
    pub r2_objects: u64,
}

/// A zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneRecord {
    /// Zone id.
    pub id: String,
    /// Domain.
    pub name: String,
    /// Status.
    pub status: String,
    /// Paused flag.
    pub paused: bool,
    /// Plan name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Last modification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
    /// Present for the enriched zones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ZoneDetail>,
}

/// Per-zone detail. Each part is fetched independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDetail {
    /// DNS record count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_records: Option<u64>,
    /// Certificate status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<SslStatus>,
    /// Last 24h of HTTP traffic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics: Option<ZoneAnalytics>,
}

/// Certificate pack status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SslStatus {
    /// `active` when every pack is active, else the first other status.
    pub status: String,
    /// Number of certificate packs.
    pub packs: u64,
    /// Soonest certificate expiry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_expiry: Option<DateTime<Utc>>,
}

/// HTTP traffic totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneAnalytics {
    /// Requests.
    #[serde(rename = "requests24h")]
    pub requests_24h: u64,
    /// Bytes served.
    #[serde(rename = "bytes24h")]
    pub bytes_24h: u64,
    /// Requests served from cache.
    #[serde(rename = "cachedRequests24h")]
    pub cached_requests_24h: u64,
    /// Threats blocked.
    #[serde(rename = "threats24h")]
    pub threats_24h: u64,
    /// Cached share of requests, percent.
    pub cache_hit_percent: f64,
}

/// A Workers script.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRecord {
    /// Script name.
    pub name: String,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    /// Last modification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

/// An R2 bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRecord {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Location hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Usage, present for the enriched buckets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<BucketUsage>,
}

/// R2 bucket usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketUsage {
    /// Stored bytes.
    pub payload_bytes: u64,
    /// Stored objects.
    pub object_count: u64,
}

// ============================================================================
// Normalization
// ============================================================================

/// Orders zones most recently modified first; zones without a timestamp last.
pub fn sort_zones(zones: &mut [RawZone]) {
    zones.sort_by(|a, b| b.modified_on.cmp(&a.modified_on).then_with(|| a.name.cmp(&b.name)));
}

/// Collapses certificate packs into one status.
pub fn ssl_status(packs: &[RawCertificatePack]) -> SslStatus {
    let status = packs
        .iter()
        .map(|p| p.status.as_str())
        .find(|s| *s != "active")
        .unwrap_or(if packs.is_empty() { "none" } else { "active" })
        .to_string();
    let earliest_expiry = packs
        .iter()
        .flat_map(|p| &p.certificates)
        .filter_map(|c| c.expires_on)
        .min();

    SslStatus {
        status,
        packs: packs.len() as u64,
        earliest_expiry,
    }
}

/// Sums hourly analytics groups.
pub fn sum_analytics(groups: &[RawRequestGroup]) -> ZoneAnalytics {
    let mut totals = ZoneAnalytics::default();
    for group in groups {
        totals.requests_24h += group.sum.requests;
        totals.bytes_24h += group.sum.bytes;
        totals.cached_requests_24h += group.sum.cached_requests;
        totals.threats_24h += group.sum.threats;
    }
    totals.cache_hit_percent = percent_of(totals.cached_requests_24h, totals.requests_24h);
    totals
}

/// Builds the summary from enriched zones and the optional account sections.
pub fn summarize(
    zones: Vec<Enriched<RawZone, ZoneDetail>>,
    workers: Option<Vec<RawWorkerScript>>,
    buckets: Option<Vec<Enriched<RawBucket, RawBucketUsage>>>,
) -> CloudflareSummary {
    let mut counts = CloudflareCounts {
        total_zones: zones.len() as u64,
        ..CloudflareCounts::default()
    };

    let zones: Vec<ZoneRecord> = zones
        .into_iter()
        .map(|enriched| {
            let (zone, detail) = enriched.into_parts();
            if zone.status == "active" {
                counts.active_zones += 1;
            }
            if zone.paused {
                counts.paused_zones += 1;
            }
            if let Some(detail) = &detail {
                counts.dns_records += detail.dns_records.unwrap_or(0);
                if let Some(analytics) = &detail.analytics {
                    counts.requests_24h += analytics.requests_24h;
                    counts.bandwidth_24h += analytics.bytes_24h;
                    counts.threats_24h += analytics.threats_24h;
                }
            }
            ZoneRecord {
                id: zone.id,
                name: zone.name,
                status: zone.status,
                paused: zone.paused,
                plan: zone.plan.map(|p| p.name),
                modified_on: zone.modified_on,
                detail,
            }
        })
        .collect();

    let workers = workers.map(|scripts| {
        counts.workers = scripts.len() as u64;
        scripts
            .into_iter()
            .map(|script| WorkerRecord {
                name: script.id,
                created_on: script.created_on,
                modified_on: script.modified_on,
            })
            .collect()
    });

    let r2_buckets = buckets.map(|buckets| {
        counts.buckets = buckets.len() as u64;
        buckets
            .into_iter()
            .map(|enriched| {
                let (bucket, usage) = enriched.into_parts();
                let usage = usage.map(|u| BucketUsage {
                    payload_bytes: u.payload_size,
                    object_count: u.object_count,
                });
                if let Some(usage) = usage {
                    counts.r2_bytes += usage.payload_bytes;
                    counts.r2_objects += usage.object_count;
                }
                BucketRecord {
                    name: bucket.name,
                    created_at: bucket.creation_date,
                    location: bucket.location,
                    usage,
                }
            })
            .collect()
    });

    CloudflareSummary {
        summary: counts,
        zones,
        workers,
        r2_buckets,
    }
}
