//! End-to-end Vercel Blob listing against a local upstream.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};

use infrapulse_core::ErrorKind;
use infrapulse_fetch::FetchContext;
use infrapulse_providers::{BlobAdapter, ProviderError};

const TOTAL_OBJECTS: usize = 2_500;
const PAGE_SIZE: usize = 1_000;

#[derive(Clone)]
struct Store {
    pages: Arc<AtomicUsize>,
    repeat_cursor: bool,
}

fn object(index: usize) -> Value {
    let (dir, ext, content_type) = match index % 4 {
        0 => ("images", "png", Some("image/png")),
        1 => ("images", "jpg", None),
        2 => ("docs", "pdf", Some("application/pdf")),
        _ => ("", "json", Some("application/json; charset=utf-8")),
    };
    let pathname = if dir.is_empty() {
        format!("file-{index}.{ext}")
    } else {
        format!("{dir}/file-{index}.{ext}")
    };
    let uploaded_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        + Duration::minutes(i64::try_from(index).unwrap());

    json!({
        "url": format!("https://store.example.com/{pathname}"),
        "pathname": pathname,
        "size": 100 + (index % 7) * 50,
        "uploadedAt": uploaded_at.to_rfc3339(),
        "contentType": content_type,
    })
}

async fn list(
    State(store): State<Store>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer blob_token") {
        return StatusCode::FORBIDDEN.into_response();
    }
    store.pages.fetch_add(1, Ordering::SeqCst);

    let page: usize = match params.get("cursor").map(String::as_str) {
        None => 0,
        Some("c1") => 1,
        Some("c2") => 2,
        Some(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    let start = page * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(TOTAL_OBJECTS);
    let blobs: Vec<Value> = (start..end).map(object).collect();
    let has_more = end < TOTAL_OBJECTS;
    let cursor = match (has_more, store.repeat_cursor) {
        (false, _) => Value::Null,
        (true, true) => json!("c1"),
        (true, false) => json!(format!("c{}", page + 1)),
    };

    Json(json!({ "blobs": blobs, "cursor": cursor, "hasMore": has_more })).into_response()
}

async fn start_store(repeat_cursor: bool) -> (SocketAddr, Store) {
    let store = Store {
        pages: Arc::new(AtomicUsize::new(0)),
        repeat_cursor,
    };
    let router = Router::new().route("/", get(list)).with_state(store.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, store)
}

#[tokio::test]
async fn test_lists_every_page_and_summarizes() {
    let (addr, store) = start_store(false).await;
    let ctx = FetchContext::new().unwrap();
    let adapter = BlobAdapter::new("blob_token", 1_000_000_000, 10).with_base_url(format!("http://{addr}"));

    let summary = adapter.fetch_summary(&ctx).await.unwrap();

    assert_eq!(store.pages.load(Ordering::SeqCst), 3);
    assert_eq!(summary.summary.total_files, 2500);

    let percent_total: f64 = summary.by_type.iter().map(|b| b.percentage).sum();
    assert!((percent_total - 100.0).abs() <= 0.1, "byType sums to {percent_total}");
    assert_eq!(summary.by_type.len(), 4);
    assert!(summary.by_type.iter().any(|b| b.key == "image/jpeg"));
    assert!(summary.by_type.iter().any(|b| b.key == "application/json"));
    assert!(summary.by_directory.iter().any(|b| b.key == "/"));

    assert_eq!(summary.recent_uploads.len(), 10);
    assert_eq!(summary.recent_uploads[0].pathname, "file-2499.json");
    assert!(summary
        .recent_uploads
        .windows(2)
        .all(|w| w[0].uploaded_at > w[1].uploaded_at));

    let bytes: u64 = summary.by_type.iter().map(|b| b.bytes).sum();
    assert_eq!(bytes, summary.summary.total_bytes);
    assert_eq!(summary.quota.used_bytes, summary.summary.total_bytes);
}

#[tokio::test]
async fn test_repeated_cursor_is_upstream_error() {
    let (addr, store) = start_store(true).await;
    let ctx = FetchContext::new().unwrap();
    let adapter = BlobAdapter::new("blob_token", 1024, 10).with_base_url(format!("http://{addr}"));

    let err = adapter.fetch_summary(&ctx).await.unwrap_err();

    assert!(matches!(err, ProviderError::Upstream { authenticated: true, .. }));
    assert_eq!(err.kind(), ErrorKind::Upstream);
    assert_eq!(store.pages.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_rejected_token_is_authentication_failure() {
    let (addr, store) = start_store(false).await;
    let ctx = FetchContext::new().unwrap();
    let adapter = BlobAdapter::new("wrong", 1024, 10).with_base_url(format!("http://{addr}"));

    let err = adapter.fetch_summary(&ctx).await.unwrap_err();

    assert!(matches!(err, ProviderError::Authentication { status: 403 }));
    assert!(!err.configured());
    assert_eq!(store.pages.load(Ordering::SeqCst), 0);
}
