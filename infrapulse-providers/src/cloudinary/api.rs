//! Cloudinary Admin API schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::normalize::flexible_u64;

/// Cloudinary API base URL, without the cloud name.
pub const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// `GET /usage` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUsage {
    /// Plan name.
    #[serde(default)]
    pub plan: Option<String>,
    /// When the figures were computed.
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Credit consumption.
    #[serde(default)]
    pub credits: Option<RawCredits>,
    /// Storage bytes.
    #[serde(default)]
    pub storage: Option<RawMeter>,
    /// Bandwidth bytes.
    #[serde(default)]
    pub bandwidth: Option<RawMeter>,
    /// Transformations.
    #[serde(default)]
    pub transformations: Option<RawMeter>,
    /// Stored assets.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub resources: u64,
    /// Derived assets.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub derived_resources: u64,
    /// API requests.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub requests: u64,
}

/// Credits block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCredits {
    /// Credits used.
    #[serde(default)]
    pub usage: f64,
    /// Credit allowance.
    #[serde(default)]
    pub limit: Option<f64>,
    /// Used share, percent.
    #[serde(default)]
    pub used_percent: Option<f64>,
}

/// A usage meter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMeter {
    /// Raw usage.
    #[serde(default, deserialize_with = "flexible_u64")]
    pub usage: u64,
    /// Credits the usage accounts for.
    #[serde(default)]
    pub credits_usage: Option<f64>,
}

/// `GET /resources/image` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResources {
    /// Assets.
    #[serde(default)]
    pub resources: Vec<RawResource>,
}

/// An asset.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResource {
    /// Public id.
    pub public_id: String,
    /// File format.
    #[serde(default)]
    pub format: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub bytes: u64,
    /// Width in pixels.
    #[serde(default)]
    pub width: Option<u32>,
    /// Height in pixels.
    #[serde(default)]
    pub height: Option<u32>,
    /// Upload time.
    pub created_at: DateTime<Utc>,
    /// HTTPS delivery URL.
    #[serde(default)]
    pub secure_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usage() {
        let json = r#"{
            "plan": "Free",
            "last_updated": "2024-05-01",
            "transformations": {"usage": 120, "credits_usage": 0.12},
            "objects": {"usage": 310},
            "bandwidth": {"usage": 52428800, "credits_usage": 0.05},
            "storage": {"usage": 104857600, "credits_usage": 0.1},
            "credits": {"usage": 0.27, "limit": 25, "used_percent": 1.08},
            "requests": 1500,
            "resources": 310,
            "derived_resources": 42
        }"#;
        let usage: RawUsage = serde_json::from_str(json).unwrap();
        assert_eq!(usage.storage.unwrap().usage, 104_857_600);
        assert_eq!(usage.credits.unwrap().limit, Some(25.0));
        assert_eq!(usage.derived_resources, 42);
    }
}
