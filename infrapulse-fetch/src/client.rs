//! HTTP client shared by all adapters.
//!
//! Wraps a single `reqwest::Client` (one connection pool) and adds:
//! - auth strategy application, including the Digest handshake
//! - request/response tracing with query strings stripped
//! - status mapping and JSON decoding at the boundary

use std::time::Duration;

use reqwest::header::{HeaderMap, AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::auth::{AuthStrategy, DigestAuth, DigestChallenge};
use crate::error::{DigestError, FetchError};
use crate::request::PendingRequest;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for infrapulse.
const USER_AGENT: &str = concat!("infrapulse/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client with auth strategies and tracing.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            timeout,
        })
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends a request with the given auth strategy.
    ///
    /// For Digest auth this performs the two-request handshake. The first
    /// response is returned unchanged unless it is a `401`; a `401` without
    /// a Digest challenge, or a non-2xx second response, is an error.
    /// Other strategies return the response whatever its status.
    #[instrument(
        skip(self, auth, request),
        fields(method = %request.method, url = %display_url(&request.url), auth = auth.name())
    )]
    pub async fn send(
        &self,
        auth: &AuthStrategy,
        request: PendingRequest,
    ) -> Result<Response, FetchError> {
        match auth {
            AuthStrategy::Digest(digest) => self.send_digest(digest, request).await,
            _ => self.execute(&auth.sign(request)).await,
        }
    }

    async fn send_digest(
        &self,
        digest: &DigestAuth,
        request: PendingRequest,
    ) -> Result<Response, FetchError> {
        let first = self.execute(&request).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        let challenge = digest_challenge(first.headers())?;
        debug!(realm = %challenge.realm, "Received Digest challenge");

        let authorization = digest.authorization(
            &challenge,
            request.method.as_str(),
            &request.request_uri(),
        )?;
        let retry = request.clone().header(AUTHORIZATION, &authorization);
        let second = self.execute(&retry).await?;

        if second.status().is_success() {
            Ok(second)
        } else {
            warn!(status = %second.status(), "Digest handshake rejected");
            Err(FetchError::from_status(second.status().as_u16(), &request.url))
        }
    }

    async fn execute(&self, request: &PendingRequest) -> Result<Response, FetchError> {
        debug!("Sending request");
        let response = request
            .build(&self.inner)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout)
                } else {
                    FetchError::Http(e)
                }
            })?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Sends a request and decodes a successful JSON body.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        auth: &AuthStrategy,
        request: PendingRequest,
    ) -> Result<T, FetchError> {
        self.fetch_json_with_headers(auth, request)
            .await
            .map(|(body, _)| body)
    }

    /// Like [`fetch_json`](Self::fetch_json), also returning response
    /// headers for `Link` pagination.
    pub async fn fetch_json_with_headers<T: DeserializeOwned>(
        &self,
        auth: &AuthStrategy,
        request: PendingRequest,
    ) -> Result<(T, HeaderMap), FetchError> {
        let url = request.url.clone();
        let response = ensure_success(self.send(auth, request).await?, &url)?;
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        Ok((parse_json(&bytes)?, headers))
    }

    /// Returns the inner reqwest client for advanced operations.
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

/// Maps a non-2xx response to an error.
pub fn ensure_success(response: Response, url: &Url) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if response.is_rate_limited() {
        warn!(
            url = %display_url(url),
            retry_after = ?response.retry_after_secs(),
            "Rate limited by upstream"
        );
    }
    Err(FetchError::from_status(status.as_u16(), url))
}

/// Decodes a JSON body into an explicit schema type.
pub fn parse_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(bytes).map_err(FetchError::from)
}

fn digest_challenge(headers: &HeaderMap) -> Result<DigestChallenge, FetchError> {
    let header = headers
        .get_all(WWW_AUTHENTICATE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| {
            value
                .trim_start()
                .get(..6)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("digest"))
        })
        .ok_or(DigestError::MissingChallenge)?;

    Ok(DigestChallenge::parse(header)?)
}

/// URL without query string, safe for logs.
pub(crate) fn display_url(url: &Url) -> String {
    format!(
        "{}://{}{}",
        url.scheme(),
        url.host_str().unwrap_or_default(),
        url.path()
    )
}

// ============================================================================
// Response Extensions
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Check if the response indicates rate limiting.
    fn is_rate_limited(&self) -> bool;

    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn is_rate_limited(&self) -> bool {
        self.status() == StatusCode::TOO_MANY_REQUESTS
    }

    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

// ============================================================================
// Tests
// ============================================================================
