//! Cloudinary normalized summary.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::api::{RawResource, RawUsage};
use crate::normalize::round_to;

/// Normalized Cloudinary data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudinarySummary {
    /// Account usage.
    pub summary: CloudinaryUsage,
    /// Most recent image uploads, newest first; absent if the listing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_uploads: Option<Vec<AssetRecord>>,
}

/// Account usage figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudinaryUsage {
    /// Cloud name.
    pub cloud_name: String,
    /// Plan name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    /// Credits used.
    pub credits_used: f64,
    /// Credit allowance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_limit: Option<f64>,
    /// Used share of credits, percent.
    pub credits_percent: f64,
    /// Stored bytes.
    pub storage_bytes: u64,
    /// Delivered bytes.
    pub bandwidth_bytes: u64,
    /// Transformations.
    pub transformations: u64,
    /// Stored assets.
    pub resources: u64,
    /// Derived assets.
    pub derived_resources: u64,
    /// API requests.
    pub requests: u64,
    /// When upstream computed the figures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// An uploaded asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Public id.
    pub public_id: String,
    /// Format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Size in bytes.
    pub bytes: u64,
    /// Pixel dimensions, `WxH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    /// Upload time.
    pub created_at: DateTime<Utc>,
    /// Delivery URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Normalizes `/usage`.
pub fn usage(cloud_name: &str, raw: RawUsage) -> CloudinaryUsage {
    let credits = raw.credits.unwrap_or_default();
    let credits_percent = match (credits.used_percent, credits.limit) {
        (Some(percent), _) => round_to(percent, 1),
        (None, Some(limit)) if limit > 0.0 => round_to(credits.usage / limit * 100.0, 1),
        _ => 0.0,
    };

    CloudinaryUsage {
        cloud_name: cloud_name.to_string(),
        plan: raw.plan,
        credits_used: round_to(credits.usage, 2),
        credits_limit: credits.limit,
        credits_percent,
        storage_bytes: raw.storage.map_or(0, |m| m.usage),
        bandwidth_bytes: raw.bandwidth.map_or(0, |m| m.usage),
        transformations: raw.transformations.map_or(0, |m| m.usage),
        resources: raw.resources,
        derived_resources: raw.derived_resources,
        requests: raw.requests,
        last_updated: raw.last_updated,
    }
}

/// Newest assets first, capped.
pub fn recent_assets(mut resources: Vec<RawResource>, cap: usize) -> Vec<AssetRecord> {
    resources.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    resources.truncate(cap);
    resources
        .into_iter()
        .map(|r| AssetRecord {
            dimensions: match (r.width, r.height) {
                (Some(w), Some(h)) => Some(format!("{w}x{h}")),
                _ => None,
            },
            public_id: r.public_id,
            format: r.format,
            bytes: r.bytes,
            created_at: r.created_at,
            url: r.secure_url,
        })
        .collect()
}
