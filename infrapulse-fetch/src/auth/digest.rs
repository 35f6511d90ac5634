//! RFC 2617 Digest authentication.
//!
//! The handshake itself lives in [`HttpClient::send`](crate::HttpClient::send):
//! an unauthenticated request, a `401` carrying a `WWW-Authenticate: Digest`
//! challenge, then one authenticated retry. This module parses challenges
//! and computes responses.
//!
//! The nonce-count is always `00000001`. Every request performs a fresh
//! handshake, so a nonce is never used twice.

use std::collections::HashMap;
use std::fmt;

use md5::{Digest as _, Md5};

use crate::error::DigestError;

/// Nonce-count sent with every response.
pub const NONCE_COUNT: &str = "00000001";

const QOP_AUTH: &str = "auth";

// ============================================================================
// Challenge
// ============================================================================

/// A parsed `WWW-Authenticate: Digest` challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    /// Protection space.
    pub realm: String,
    /// Server nonce.
    pub nonce: String,
    /// Offered quality-of-protection values, comma separated.
    pub qop: Option<String>,
    /// Opaque value echoed back verbatim.
    pub opaque: Option<String>,
    /// Hash algorithm; only MD5 is supported.
    pub algorithm: Option<String>,
}

impl DigestChallenge {
    /// Parses a header value such as `Digest realm="x", nonce="y"`.
    pub fn parse(header: &str) -> Result<Self, DigestError> {
        let header = header.trim();
        let (scheme, rest) = header
            .split_once(char::is_whitespace)
            .unwrap_or((header, ""));
        if !scheme.eq_ignore_ascii_case("digest") {
            return Err(DigestError::UnsupportedScheme(scheme.to_string()));
        }

        let mut params = tokenize(rest)?;
        let realm = params
            .remove("realm")
            .ok_or(DigestError::MissingParameter("realm"))?;
        let nonce = params
            .remove("nonce")
            .ok_or(DigestError::MissingParameter("nonce"))?;

        Ok(Self {
            realm,
            nonce,
            qop: params.remove("qop"),
            opaque: params.remove("opaque"),
            algorithm: params.remove("algorithm"),
        })
    }

    /// Picks `auth` from the offered qop list. `None` means no qop.
    pub fn select_qop(&self) -> Result<Option<&'static str>, DigestError> {
        match &self.qop {
            None => Ok(None),
            Some(offered) => offered
                .split(',')
                .map(str::trim)
                .any(|q| q.eq_ignore_ascii_case(QOP_AUTH))
                .then_some(Some(QOP_AUTH))
                .ok_or_else(|| DigestError::UnsupportedQop(offered.clone())),
        }
    }
}

/// Splits `key=value` pairs, honoring quoted strings with backslash escapes.
fn tokenize(input: &str) -> Result<HashMap<String, String>, DigestError> {
    let mut params = HashMap::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| *c != '=') {
            if c == ',' {
                return Err(DigestError::Malformed(format!("parameter `{}` has no value", key.trim())));
            }
            key.push(c);
        }
        if chars.next() != Some('=') {
            return Err(DigestError::Malformed(format!("parameter `{}` has no value", key.trim())));
        }
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        let mut value = String::new();
        if chars.next_if_eq(&'"').is_some() {
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => value.push(c),
                }
            }
            if !closed {
                return Err(DigestError::Malformed("unterminated quoted string".to_string()));
            }
        } else {
            while let Some(c) = chars.next_if(|c| *c != ',') {
                value.push(c);
            }
            value = value.trim_end().to_string();
        }

        params.insert(key.trim().to_ascii_lowercase(), value);
    }

    Ok(params)
}

// ============================================================================
// Response
// ============================================================================

/// Username and password for Digest auth.
#[derive(Clone, PartialEq, Eq)]
pub struct DigestAuth {
    username: String,
    password: String,
}

impl DigestAuth {
    /// Creates Digest credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds the `Authorization` header value with a random cnonce.
    pub fn authorization(
        &self,
        challenge: &DigestChallenge,
        method: &str,
        uri: &str,
    ) -> Result<String, DigestError> {
        let cnonce = hex::encode(rand::random::<[u8; 8]>());
        self.authorization_with_cnonce(challenge, method, uri, &cnonce)
    }

    /// Builds the `Authorization` header value with a fixed cnonce.
    pub fn authorization_with_cnonce(
        &self,
        challenge: &DigestChallenge,
        method: &str,
        uri: &str,
        cnonce: &str,
    ) -> Result<String, DigestError> {
        if let Some(algorithm) = &challenge.algorithm {
            if !algorithm.eq_ignore_ascii_case("md5") {
                return Err(DigestError::UnsupportedAlgorithm(algorithm.clone()));
            }
        }

        let qop = challenge.select_qop()?;
        let response = self.response(challenge, method, uri, qop.map(|q| (q, cnonce)));

        let mut header = format!(
            r#"Digest username="{}", realm="{}", nonce="{}", uri="{}", response="{}""#,
            quote(&self.username),
            quote(&challenge.realm),
            quote(&challenge.nonce),
            quote(uri),
            response
        );
        if let Some(opaque) = &challenge.opaque {
            header.push_str(&format!(r#", opaque="{}""#, quote(opaque)));
        }
        if let Some(algorithm) = &challenge.algorithm {
            header.push_str(&format!(", algorithm={algorithm}"));
        }
        if let Some(qop) = qop {
            header.push_str(&format!(r#", qop={qop}, nc={NONCE_COUNT}, cnonce="{cnonce}""#));
        }

        Ok(header)
    }

    /// Computes the `response` hash. `qop` carries `(qop, cnonce)`.
    pub fn response(
        &self,
        challenge: &DigestChallenge,
        method: &str,
        uri: &str,
        qop: Option<(&str, &str)>,
    ) -> String {
        let ha1 = md5_hex(&format!(
            "{}:{}:{}",
            self.username, challenge.realm, self.password
        ));
        let ha2 = md5_hex(&format!("{method}:{uri}"));

        match qop {
            Some((qop, cnonce)) => md5_hex(&format!(
                "{ha1}:{}:{NONCE_COUNT}:{cnonce}:{qop}:{ha2}",
                challenge.nonce
            )),
            None => md5_hex(&format!("{ha1}:{}:{ha2}", challenge.nonce)),
        }
    }
}

impl fmt::Debug for DigestAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

// ============================================================================
// Tests
// ============================================================================
