//! GitHub adapter against a local upstream: pagination, capping and alert ranking.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::header::LINK;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use infrapulse_fetch::FetchContext;
use infrapulse_providers::github::{GitHubCaps, Severity};
use infrapulse_providers::{GitHubAdapter, ProviderError};

#[derive(Clone, Default)]
struct Upstream {
    addr: Arc<Mutex<Option<SocketAddr>>>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl Upstream {
    fn record(&self, path: String) {
        self.hits.lock().unwrap().push(path);
    }

    fn hits_matching(&self, needle: &str) -> Vec<String> {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.contains(needle))
            .cloned()
            .collect()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer ghp_test")
}

fn repo(index: u32) -> Value {
    json!({
        "name": format!("repo-{index}"),
        "full_name": format!("octo/repo-{index}"),
        "private": index % 2 == 0,
        "fork": false,
        "archived": false,
        "language": if index % 3 == 0 { "Rust" } else { "TypeScript" },
        "stargazers_count": index,
        "forks_count": 1,
        "open_issues_count": 2,
        "pushed_at": format!("2024-05-{:02}T12:00:00Z", 1 + index),
        "html_url": format!("https://github.com/octo/repo-{index}"),
    })
}

async fn user(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "login": "octo", "name": "Octo Cat" })).into_response()
}

async fn repos(
    State(upstream): State<Upstream>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let page = params.get("page").map_or("1", String::as_str);
    upstream.record(format!("/user/repos?page={page}"));

    if page == "1" {
        let addr = upstream.addr.lock().unwrap().unwrap();
        let next = format!(r#"<http://{addr}/user/repos?page=2>; rel="next""#);
        let body = Json(json!([repo(3), repo(0), repo(6), repo(1)]));
        ([(LINK, next)], body).into_response()
    } else {
        Json(json!([repo(5), repo(2), repo(4)])).into_response()
    }
}

async fn runs(State(upstream): State<Upstream>, Path((owner, name)): Path<(String, String)>) -> Response {
    upstream.record(format!("/repos/{owner}/{name}/actions/runs"));
    Json(json!({
        "total_count": 2,
        "workflow_runs": [
            { "id": 2, "name": "CI", "status": "completed", "conclusion": "failure", "created_at": "2024-05-10T00:00:00Z" },
            { "id": 1, "name": "CI", "status": "completed", "conclusion": "success", "created_at": "2024-05-09T00:00:00Z" }
        ]
    }))
    .into_response()
}

async fn dependabot(State(upstream): State<Upstream>, Path((owner, name)): Path<(String, String)>) -> Response {
    upstream.record(format!("/repos/{owner}/{name}/dependabot/alerts"));
    Json(json!([
        { "number": 1, "created_at": "2024-04-01T00:00:00Z", "security_advisory": { "severity": "medium", "summary": "m" } },
        { "number": 2, "created_at": "2024-04-02T00:00:00Z", "security_advisory": { "severity": "critical", "summary": "c" } },
        { "number": 3, "created_at": "2024-04-03T00:00:00Z", "security_advisory": { "severity": "low", "summary": "l" } }
    ]))
    .into_response()
}

async fn code_scanning(State(upstream): State<Upstream>, Path((owner, name)): Path<(String, String)>) -> Response {
    upstream.record(format!("/repos/{owner}/{name}/code-scanning/alerts"));
    (StatusCode::NOT_FOUND, Json(json!({ "message": "no analysis found" }))).into_response()
}

async fn start_upstream() -> (SocketAddr, Upstream) {
    let upstream = Upstream::default();
    let router = Router::new()
        .route("/user", get(user))
        .route("/user/repos", get(repos))
        .route("/repos/{owner}/{name}/actions/runs", get(runs))
        .route("/repos/{owner}/{name}/dependabot/alerts", get(dependabot))
        .route("/repos/{owner}/{name}/code-scanning/alerts", get(code_scanning))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    *upstream.addr.lock().unwrap() = Some(addr);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, upstream)
}

fn adapter(addr: SocketAddr, token: &str) -> GitHubAdapter {
    GitHubAdapter::new(token)
        .with_base_url(format!("http://{addr}"))
        .with_caps(GitHubCaps {
            workflow_repos: 2,
            alert_repos: 1,
            alerts_display: 2,
        })
}

#[tokio::test]
async fn test_follows_link_pages_and_caps_detail() {
    let (addr, upstream) = start_upstream().await;
    let ctx = FetchContext::new().unwrap();

    let summary = adapter(addr, "ghp_test").fetch_summary(&ctx).await.unwrap();

    assert_eq!(upstream.hits_matching("/user/repos").len(), 2);
    assert_eq!(summary.summary.repos, 7);
    assert_eq!(summary.repositories.len(), 7);
    assert_eq!(summary.repositories[0].full_name, "octo/repo-6");

    // Only the two most recently pushed repositories carry runs.
    assert_eq!(upstream.hits_matching("/actions/runs").len(), 2);
    let with_runs: Vec<&str> = summary
        .repositories
        .iter()
        .filter(|r| r.workflow_runs.is_some())
        .map(|r| r.full_name.as_str())
        .collect();
    assert_eq!(with_runs, vec!["octo/repo-6", "octo/repo-5"]);
    assert_eq!(summary.summary.failed_runs, 2);
}

#[tokio::test]
async fn test_alerts_ranked_and_truncated() {
    let (addr, upstream) = start_upstream().await;
    let ctx = FetchContext::new().unwrap();

    let summary = adapter(addr, "ghp_test").fetch_summary(&ctx).await.unwrap();

    assert_eq!(
        upstream.hits_matching("/dependabot/alerts"),
        vec!["/repos/octo/repo-6/dependabot/alerts".to_string()]
    );
    assert_eq!(upstream.hits_matching("/code-scanning/alerts").len(), 1);

    // Counts cover every alert; the list is cut after ranking.
    assert_eq!(summary.summary.alerts.total, 3);
    assert_eq!(summary.summary.alerts.critical, 1);
    assert_eq!(summary.summary.alerts.low, 1);
    let severities: Vec<Severity> = summary.alerts.iter().map(|a| a.severity).collect();
    assert_eq!(severities, vec![Severity::Critical, Severity::Medium]);
}

#[tokio::test]
async fn test_rejected_token_before_listing() {
    let (addr, upstream) = start_upstream().await;
    let ctx = FetchContext::new().unwrap();

    let err = adapter(addr, "wrong").fetch_summary(&ctx).await.unwrap_err();

    assert!(matches!(err, ProviderError::Authentication { status: 401 }));
    assert!(upstream.hits_matching("/user/repos").is_empty());
}
