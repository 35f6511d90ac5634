//! Cloudflare adapter against a local upstream: zone ordering, the
//! enrichment cap and per-zone sub-fetch isolation.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use infrapulse_fetch::FetchContext;
use infrapulse_providers::{CloudflareAdapter, ProviderError};

#[derive(Clone, Default)]
struct Upstream {
    hits: Arc<Mutex<Vec<String>>>,
}

impl Upstream {
    fn record(&self, hit: String) {
        self.hits.lock().unwrap().push(hit);
    }

    fn hits_matching(&self, needle: &str) -> Vec<String> {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.contains(needle))
            .cloned()
            .collect()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer cf-token")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "success": false, "errors": [{ "code": 10000, "message": "Authentication error" }], "result": null })),
    )
        .into_response()
}

fn zone(id: &str, name: &str, day: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "active",
        "paused": false,
        "plan": { "name": "Free Website" },
        "modified_on": format!("2024-05-{day:02}T08:00:00Z"),
    })
}

async fn zones(State(upstream): State<Upstream>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    upstream.record("/zones".to_string());
    Json(json!({
        "success": true,
        "errors": [],
        "result": [
            zone("z-gamma", "gamma.dev", 1),
            zone("z-alpha", "alpha.dev", 3),
            zone("z-beta", "beta.dev", 2),
        ],
        "result_info": { "page": 1, "total_pages": 1, "total_count": 3 }
    }))
    .into_response()
}

async fn dns_records(State(upstream): State<Upstream>, Path(zone): Path<String>) -> Json<Value> {
    upstream.record(format!("/zones/{zone}/dns_records"));
    let total = if zone == "z-alpha" { 12 } else { 7 };
    Json(json!({
        "success": true,
        "errors": [],
        "result": [],
        "result_info": { "page": 1, "total_pages": total, "total_count": total }
    }))
}

async fn certificate_packs(State(upstream): State<Upstream>, Path(zone): Path<String>) -> Response {
    upstream.record(format!("/zones/{zone}/ssl/certificate_packs"));
    if zone == "z-beta" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "errors": [{ "code": 1003, "message": "Not found" }], "result": null })),
        )
            .into_response();
    }
    Json(json!({
        "success": true,
        "errors": [],
        "result": [{
            "status": "active",
            "certificates": [
                { "expires_on": "2024-08-01T00:00:00Z" },
                { "expires_on": "2024-07-01T00:00:00Z" }
            ]
        }]
    }))
    .into_response()
}

async fn graphql(State(upstream): State<Upstream>, Json(body): Json<Value>) -> Json<Value> {
    let tag = body["variables"]["zoneTag"].as_str().unwrap_or_default().to_string();
    upstream.record(format!("/graphql {tag}"));
    Json(json!({
        "data": { "viewer": { "zones": [{ "httpRequests1hGroups": [
            { "sum": { "requests": 100, "bytes": 4096, "cachedRequests": 50, "threats": 1 } },
            { "sum": { "requests": 50, "bytes": 1024, "cachedRequests": 25, "threats": 0 } }
        ]}]}},
        "errors": null
    }))
}

async fn start_upstream() -> (SocketAddr, Upstream) {
    let upstream = Upstream::default();

    let router = Router::new()
        .route("/zones", get(zones))
        .route("/zones/{zone}/dns_records", get(dns_records))
        .route("/zones/{zone}/ssl/certificate_packs", get(certificate_packs))
        .route("/graphql", post(graphql))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, upstream)
}

fn adapter(addr: SocketAddr, token: &str) -> CloudflareAdapter {
    CloudflareAdapter::new(token, None)
        .with_base_url(format!("http://{addr}"))
        .with_caps(2, 10)
}

#[tokio::test]
async fn test_ssl_not_found_keeps_other_zone_detail() {
    let (addr, _upstream) = start_upstream().await;
    let ctx = FetchContext::new().unwrap();

    let summary = adapter(addr, "cf-token").fetch_summary(&ctx).await.unwrap();

    let names: Vec<_> = summary.zones.iter().map(|z| z.name.as_str()).collect();
    assert_eq!(names, vec!["alpha.dev", "beta.dev", "gamma.dev"]);

    let alpha = summary.zones[0].detail.as_ref().unwrap();
    assert_eq!(alpha.dns_records, Some(12));
    let ssl = alpha.ssl.as_ref().unwrap();
    assert_eq!(ssl.status, "active");
    assert_eq!(ssl.packs, 1);
    assert_eq!(
        ssl.earliest_expiry,
        Some(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap())
    );
    assert_eq!(alpha.analytics.as_ref().unwrap().requests_24h, 150);

    // Only the SSL section is omitted for the zone whose lookup failed.
    let beta = summary.zones[1].detail.as_ref().unwrap();
    assert!(beta.ssl.is_none());
    assert_eq!(beta.dns_records, Some(7));
    let analytics = beta.analytics.as_ref().unwrap();
    assert_eq!(analytics.requests_24h, 150);
    assert_eq!(analytics.bytes_24h, 5120);
    assert_eq!(analytics.cache_hit_percent, 50.0);

    let serialized = serde_json::to_value(&summary.zones[1]).unwrap();
    assert!(serialized["detail"].get("ssl").is_none());
    assert_eq!(serialized["detail"]["dnsRecords"], 7);

    assert!(summary.zones[2].detail.is_none());
    assert!(summary.workers.is_none());
    assert!(summary.r2_buckets.is_none());

    let counts = summary.summary;
    assert_eq!(counts.total_zones, 3);
    assert_eq!(counts.active_zones, 3);
    assert_eq!(counts.dns_records, 19);
    assert_eq!(counts.requests_24h, 300);
    assert_eq!(counts.bandwidth_24h, 10240);
    assert_eq!(counts.threats_24h, 2);
}

#[tokio::test]
async fn test_zones_past_the_cap_are_not_enriched() {
    let (addr, upstream) = start_upstream().await;
    let ctx = FetchContext::new().unwrap();

    adapter(addr, "cf-token").fetch_summary(&ctx).await.unwrap();

    assert_eq!(upstream.hits_matching("/zones").len(), 5);
    assert_eq!(upstream.hits_matching("/dns_records").len(), 2);
    assert_eq!(upstream.hits_matching("/certificate_packs").len(), 2);
    assert_eq!(upstream.hits_matching("/graphql").len(), 2);
    assert!(upstream.hits_matching("z-gamma").is_empty());
}

#[tokio::test]
async fn test_rejected_token_is_authentication_failure() {
    let (addr, upstream) = start_upstream().await;
    let ctx = FetchContext::new().unwrap();

    let err = adapter(addr, "wrong").fetch_summary(&ctx).await.unwrap_err();

    assert!(matches!(err, ProviderError::Authentication { status: 401 }));
    assert!(upstream.hits_matching("/").is_empty());
}
