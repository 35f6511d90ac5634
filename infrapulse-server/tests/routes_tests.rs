//! Integration tests for the HTTP boundary.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use infrapulse_core::{Config, ProviderKind};
use infrapulse_fetch::{FetchContext, FetchError};
use infrapulse_providers::{blob, Aggregator, ProviderAdapter, ProviderError, ProviderSummary};
use infrapulse_server::{build_router, AppState, StaticTokenVerifier};
use serde_json::Value;

const ADMIN_TOKEN: &str = "admin-s3cret";

enum Behavior {
    Succeed,
    RejectCredentials,
    FailAfterAuth,
}

struct StubAdapter {
    kind: ProviderKind,
    behavior: Behavior,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProviderAdapter for StubAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn fetch(&self, _ctx: &FetchContext) -> Result<ProviderSummary, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Succeed => Ok(blob::summarize(&[], 1024, 10).into()),
            Behavior::RejectCredentials => Err(ProviderError::Authentication { status: 401 }),
            Behavior::FailAfterAuth => Err(ProviderError::from(FetchError::InvalidResponse(
                "truncated body".to_string(),
            ))),
        }
    }
}

struct TestServer {
    addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(token: Option<&str>) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let stub = |kind, behavior| -> Arc<dyn ProviderAdapter> {
            Arc::new(StubAdapter {
                kind,
                behavior,
                calls: Arc::clone(&calls),
            })
        };

        let aggregator = Aggregator::from_config(&Config::default())
            .with_adapter(stub(ProviderKind::VercelBlob, Behavior::Succeed))
            .with_adapter(stub(ProviderKind::GitHub, Behavior::RejectCredentials))
            .with_adapter(stub(ProviderKind::Sentry, Behavior::FailAfterAuth));
        let state = AppState::new(
            aggregator,
            FetchContext::new().unwrap(),
            Arc::new(StaticTokenVerifier::new(token.map(str::to_string))),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(Arc::new(state));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            addr,
            calls,
            client: reqwest::Client::new(),
        }
    }

    async fn get(&self, path: &str, token: Option<&str>) -> (u16, Value) {
        let mut request = self.client.get(format!("http://{}{path}", self.addr));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let server = TestServer::start(Some(ADMIN_TOKEN)).await;
    let (status, body) = server.get("/health", None).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
    assert!(body["uptimeSeconds"].is_u64());
    assert_eq!(server.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unauthorized_before_any_provider() {
    let server = TestServer::start(Some(ADMIN_TOKEN)).await;

    let (status, body) = server.get("/api/infra", None).await;
    assert_eq!(status, 401);
    assert!(body["error"].is_string());

    let (status, _) = server.get("/api/infra/blob", Some("wrong")).await;
    assert_eq!(status, 401);

    assert_eq!(server.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_no_admin_token_configured_rejects_everyone() {
    let server = TestServer::start(None).await;
    let (status, _) = server.get("/api/infra", Some(ADMIN_TOKEN)).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_dashboard_always_200() {
    let server = TestServer::start(Some(ADMIN_TOKEN)).await;
    let (status, body) = server.get("/api/infra", Some(ADMIN_TOKEN)).await;

    assert_eq!(status, 200);
    assert_eq!(body["outcome"], "partial");
    assert!(body["generatedAt"].is_string());

    let providers = body["providers"].as_object().unwrap();
    assert_eq!(providers.len(), 9);
    assert_eq!(providers["blob"]["configured"], true);
    assert_eq!(providers["blob"]["summary"]["totalFiles"], 0);
    assert_eq!(providers["github"]["configured"], false);
    assert!(providers["github"]["error"].is_string());
    assert_eq!(providers["sentry"]["configured"], true);
    assert_eq!(providers["neon"]["configured"], false);
    assert!(providers["neon"]["message"].as_str().unwrap().contains("NEON_API_KEY"));
    assert_eq!(server.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_single_provider_status_codes() {
    let server = TestServer::start(Some(ADMIN_TOKEN)).await;

    let (status, body) = server.get("/api/infra/blob", Some(ADMIN_TOKEN)).await;
    assert_eq!(status, 200);
    assert_eq!(body["configured"], true);
    assert!(body["recentUploads"].is_array());

    let (status, body) = server.get("/api/infra/github", Some(ADMIN_TOKEN)).await;
    assert_eq!(status, 401);
    assert_eq!(body["configured"], false);
    assert_eq!(body["error"], "Invalid GitHub credentials");

    let (status, body) = server.get("/api/infra/sentry", Some(ADMIN_TOKEN)).await;
    assert_eq!(status, 500);
    assert_eq!(body["configured"], true);
    assert_eq!(body["details"], "invalid response: truncated body");

    let (status, body) = server.get("/api/infra/atlas", Some(ADMIN_TOKEN)).await;
    assert_eq!(status, 200);
    assert_eq!(body["configured"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_unknown_provider_is_404() {
    let server = TestServer::start(Some(ADMIN_TOKEN)).await;
    let (status, body) = server.get("/api/infra/heroku", Some(ADMIN_TOKEN)).await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "Unknown provider: heroku");
}

#[tokio::test]
async fn test_admin_token_header() {
    let server = TestServer::start(Some(ADMIN_TOKEN)).await;
    let response = server
        .client
        .get(format!("http://{}/api/infra/blob", server.addr))
        .header("x-admin-token", ADMIN_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
