//! Admin session verification.
//!
//! The boundary only needs two facts about a caller: whether they are
//! authenticated and whether they are an admin. Where those facts come
//! from is behind [`SessionVerifier`].

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

/// Header carrying the admin token as an alternative to `Authorization`.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// What the verifier knows about the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFact {
    /// The caller presented valid credentials.
    pub authenticated: bool,
    /// The caller may see the infrastructure dashboard.
    pub is_admin: bool,
}

impl SessionFact {
    /// An unauthenticated caller.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated admin.
    pub fn admin() -> Self {
        Self {
            authenticated: true,
            is_admin: true,
        }
    }
}

/// Decides who is calling.
pub trait SessionVerifier: Send + Sync {
    /// Inspects the request headers.
    fn verify(&self, headers: &HeaderMap) -> SessionFact;
}

// ============================================================================
// Static Token Verifier
// ============================================================================

/// Compares a presented token against one configured admin token.
///
/// Without a configured token every request is unauthenticated.
#[derive(Clone, Default)]
pub struct StaticTokenVerifier {
    token: Option<String>,
}

impl StaticTokenVerifier {
    /// Creates a verifier. Empty tokens count as unset.
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Returns true if an admin token is configured.
    pub fn is_enabled(&self) -> bool {
        self.token.is_some()
    }

    fn presented(headers: &HeaderMap) -> Option<&str> {
        let bearer = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);
        bearer.or_else(|| {
            headers
                .get(ADMIN_TOKEN_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        })
    }
}

impl SessionVerifier for StaticTokenVerifier {
    fn verify(&self, headers: &HeaderMap) -> SessionFact {
        let (Some(expected), Some(presented)) = (self.token.as_deref(), Self::presented(headers)) else {
            return SessionFact::anonymous();
        };
        if constant_time_eq(expected.as_bytes(), presented.as_bytes()) {
            SessionFact::admin()
        } else {
            SessionFact::anonymous()
        }
    }
}

impl std::fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Token comparison whose running time does not depend on where the
/// inputs first differ. Lengths are not secret.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_and_header_tokens() {
        let verifier = StaticTokenVerifier::new(Some("s3cret".to_string()));
        assert_eq!(verifier.verify(&headers("authorization", "Bearer s3cret")), SessionFact::admin());
        assert_eq!(verifier.verify(&headers(ADMIN_TOKEN_HEADER, "s3cret")), SessionFact::admin());
    }

    #[test]
    fn test_wrong_or_missing_token() {
        let verifier = StaticTokenVerifier::new(Some("s3cret".to_string()));
        assert_eq!(verifier.verify(&headers("authorization", "Bearer s3cre")), SessionFact::anonymous());
        assert_eq!(verifier.verify(&headers("authorization", "Basic s3cret")), SessionFact::anonymous());
        assert_eq!(verifier.verify(&HeaderMap::new()), SessionFact::anonymous());
    }

    #[test]
    fn test_unset_token_rejects_everyone() {
        let verifier = StaticTokenVerifier::new(Some("  ".to_string()));
        assert!(!verifier.is_enabled());
        assert_eq!(verifier.verify(&headers("authorization", "Bearer ")), SessionFact::anonymous());
        assert!(!format!("{verifier:?}").contains("s3cret"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
