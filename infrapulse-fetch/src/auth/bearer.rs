//! Bearer token auth.

use std::fmt;

use reqwest::header::AUTHORIZATION;

use crate::request::PendingRequest;

/// Attaches `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerAuth {
    token: String,
}

impl BearerAuth {
    /// Creates bearer auth for a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Signs the request.
    pub fn sign(&self, request: PendingRequest) -> PendingRequest {
        request.header(AUTHORIZATION, &format!("Bearer {}", self.token))
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuth")
            .field("token", &"<redacted>")
            .finish()
    }
}
