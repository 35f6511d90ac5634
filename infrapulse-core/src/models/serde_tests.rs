//! Serde serialization tests for core types.
//!
//! These tests pin the wire shapes the HTTP boundary depends on.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::{AggregatedDashboard, ErrorDetail, ErrorKind, ProviderKind, ProviderResult};

#[derive(Debug, Serialize)]
struct SampleSummary {
    summary: SampleCounts,
    items: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SampleCounts {
    total_zones: u32,
}

// ============================================================================
// ProviderKind Serde Tests
// ============================================================================

#[test]
fn test_provider_kind_serde_roundtrip_all_variants() {
    for kind in ProviderKind::all() {
        let json = serde_json::to_string(kind).unwrap();
        let deserialized: ProviderKind = serde_json::from_str(&json).unwrap();
        assert_eq!(*kind, deserialized, "Round-trip failed for {:?}", kind);
    }
}

#[test]
fn test_provider_kind_serializes_as_slug() {
    for kind in ProviderKind::all() {
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, json!(kind.slug()));
    }
}

#[test]
fn test_provider_kind_invalid_deserialize() {
    let result: Result<ProviderKind, _> = serde_json::from_str(r#""heroku""#);
    assert!(result.is_err());
}

// ============================================================================
// ProviderResult Wire Shapes
// ============================================================================

#[test]
fn test_not_configured_shape() {
    let result: ProviderResult<SampleSummary> =
        ProviderResult::not_configured("Set CLOUDFLARE_API_TOKEN");
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({ "configured": false, "message": "Set CLOUDFLARE_API_TOKEN" })
    );
}

#[test]
fn test_failed_shape_with_details() {
    let result: ProviderResult<SampleSummary> = ProviderResult::failed(
        false,
        ErrorDetail::new(ErrorKind::Authentication, "Invalid credentials")
            .with_details("upstream returned 401")
            .with_upstream_status(401),
    );
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({
            "configured": false,
            "error": "Invalid credentials",
            "details": "upstream returned 401"
        })
    );
}

#[test]
fn test_failed_shape_without_details() {
    let result: ProviderResult<SampleSummary> =
        ProviderResult::failed(true, ErrorDetail::new(ErrorKind::Upstream, "Failed"));
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value, json!({ "configured": true, "error": "Failed" }));
}

#[test]
fn test_ready_shape_flattens_summary() {
    let result = ProviderResult::ready(SampleSummary {
        summary: SampleCounts { total_zones: 3 },
        items: vec!["a", "b"],
    });
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(
        value,
        json!({
            "configured": true,
            "summary": { "totalZones": 3 },
            "items": ["a", "b"]
        })
    );
}

// ============================================================================
// AggregatedDashboard Serde Tests
// ============================================================================

#[test]
fn test_dashboard_keys_are_slugs() {
    let mut providers = BTreeMap::new();
    providers.insert(
        ProviderKind::VercelBlob,
        ProviderResult::<SampleSummary>::not_configured("Set BLOB_READ_WRITE_TOKEN"),
    );
    providers.insert(
        ProviderKind::GitHub,
        ProviderResult::failed(true, ErrorDetail::new(ErrorKind::Timeout, "Timed out")),
    );

    let dashboard = AggregatedDashboard::new(providers);
    let value = serde_json::to_value(&dashboard).unwrap();

    assert_eq!(value["outcome"], json!("all_failed"));
    assert_eq!(value["providers"]["blob"]["configured"], json!(false));
    assert_eq!(value["providers"]["github"]["error"], json!("Timed out"));
    assert!(value["generatedAt"].is_string());
}
