//! Authentication strategies.
//!
//! Each adapter picks one [`AuthStrategy`] at construction time. Bearer and
//! signed-query auth transform a [`PendingRequest`] in place; Digest needs a
//! round trip and is driven by [`HttpClient::send`](crate::HttpClient::send).

pub mod bearer;
pub mod digest;
pub mod signed;

pub use bearer::BearerAuth;
pub use digest::{DigestAuth, DigestChallenge};
pub use signed::{QueryParamNames, SignatureScheme, SignedQueryAuth};

use crate::request::PendingRequest;

/// How a provider authenticates outbound requests.
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// `Authorization: Bearer <token>`.
    Bearer(BearerAuth),
    /// Timestamp, key and signature query parameters.
    SignedQuery(SignedQueryAuth),
    /// RFC 2617 challenge/response.
    Digest(DigestAuth),
    /// Credentials travel in the request body.
    Unauthenticated,
}

impl AuthStrategy {
    /// Bearer auth for a token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(BearerAuth::new(token))
    }

    /// Digest auth for a username/password pair.
    pub fn digest(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Digest(DigestAuth::new(username, password))
    }

    /// Signed-query auth with the default scheme.
    pub fn signed_query(api_key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::SignedQuery(SignedQueryAuth::new(api_key, secret))
    }

    /// Applies single-step auth. Digest requests pass through unchanged.
    pub fn sign(&self, request: PendingRequest) -> PendingRequest {
        match self {
            Self::Bearer(auth) => auth.sign(request),
            Self::SignedQuery(auth) => auth.sign(request),
            Self::Digest(_) | Self::Unauthenticated => request,
        }
    }

    /// Returns true if this strategy needs a challenge round trip.
    pub fn needs_challenge(&self) -> bool {
        matches!(self, Self::Digest(_))
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::SignedQuery(_) => "signed_query",
            Self::Digest(_) => "digest",
            Self::Unauthenticated => "none",
        }
    }
}
