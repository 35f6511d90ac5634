//! Pagination helpers.
//!
//! Providers paginate in four ways: page numbers with a total, opaque
//! cursors, offsets, and RFC 8288 `Link` headers. Page/offset loops are
//! simple enough to live in the adapters; this module covers the parts
//! with edge cases.

use std::collections::{BTreeMap, HashSet};

use reqwest::header::{HeaderMap, LINK};

use crate::error::FetchError;

// ============================================================================
// Link Headers
// ============================================================================

/// One entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Target URL.
    pub url: String,
    /// Parameters such as `rel`, `results`, `cursor`.
    pub params: BTreeMap<String, String>,
}

impl LinkEntry {
    /// Returns a parameter value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns true if the relation list contains `rel`.
    pub fn has_rel(&self, rel: &str) -> bool {
        self.param("rel")
            .is_some_and(|value| value.split_whitespace().any(|r| r == rel))
    }
}

/// Parses a `Link` header value.
pub fn parse_link_header(value: &str) -> Vec<LinkEntry> {
    let mut entries = Vec::new();
    let mut rest = value;

    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start..].find('>') else {
            break;
        };
        let url = rest[start + 1..start + end].to_string();
        rest = &rest[start + end + 1..];

        let segment_end = rest.find('<').unwrap_or(rest.len());
        let params = rest[..segment_end]
            .split(';')
            .filter_map(|param| {
                let (key, value) = param.split_once('=')?;
                let value = value.trim().trim_end_matches(',').trim().trim_matches('"');
                Some((key.trim().to_ascii_lowercase(), value.to_string()))
            })
            .collect();

        entries.push(LinkEntry { url, params });
        rest = &rest[segment_end..];
    }

    entries
}

/// Returns the `rel="next"` URL, unless the entry says `results="false"`.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(parse_link_header)
        .find(|entry| entry.has_rel("next"))
        .filter(|entry| entry.param("results") != Some("false"))
        .map(|entry| entry.url)
}

// ============================================================================
// Cursor Tracking
// ============================================================================

/// Detects cursor loops in cursor-paginated listings.
#[derive(Debug, Default)]
pub struct CursorTracker {
    seen: HashSet<String>,
    pages: usize,
}

impl CursorTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the cursor for the next page.
    ///
    /// Returns `Ok(None)` when the listing is complete and an error when
    /// the upstream hands back a cursor it already returned.
    pub fn advance(&mut self, cursor: Option<String>) -> Result<Option<String>, FetchError> {
        self.pages += 1;
        let Some(cursor) = cursor.filter(|c| !c.is_empty()) else {
            return Ok(None);
        };
        if !self.seen.insert(cursor.clone()) {
            return Err(FetchError::InvalidResponse(format!(
                "pagination cursor repeated after {} pages",
                self.pages
            )));
        }
        Ok(Some(cursor))
    }

    /// Pages seen so far.
    pub fn pages(&self) -> usize {
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_github_link_header() {
        let value = r#"<https://api.github.com/user/repos?page=2>; rel="next", <https://api.github.com/user/repos?page=5>; rel="last""#;
        let entries = parse_link_header(value);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, "https://api.github.com/user/repos?page=2");
        assert!(entries[0].has_rel("next"));
        assert!(entries[1].has_rel("last"));
    }

    #[test]
    fn test_sentry_results_false_stops() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://sentry.io/api/0/x/?&cursor=0:0:1>; rel="previous"; results="false"; cursor="0:0:1", <https://sentry.io/api/0/x/?&cursor=0:100:0>; rel="next"; results="false"; cursor="0:100:0""#,
            ),
        );
        assert_eq!(next_link(&headers), None);
    }

    #[test]
    fn test_sentry_results_true_continues() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LINK,
            HeaderValue::from_static(
                r#"<https://sentry.io/a?cursor=0:0:1>; rel="previous"; results="false", <https://sentry.io/a?cursor=0:100:0>; rel="next"; results="true"; cursor="0:100:0""#,
            ),
        );
        assert_eq!(
            next_link(&headers).as_deref(),
            Some("https://sentry.io/a?cursor=0:100:0")
        );
    }

    #[test]
    fn test_no_link_header() {
        assert_eq!(next_link(&HeaderMap::new()), None);
    }

    #[test]
    fn test_cursor_tracker_detects_repeat() {
        let mut tracker = CursorTracker::new();
        assert_eq!(tracker.advance(Some("a".into())).unwrap().as_deref(), Some("a"));
        assert_eq!(tracker.advance(Some("b".into())).unwrap().as_deref(), Some("b"));
        assert!(tracker.advance(Some("a".into())).is_err());
    }

    #[test]
    fn test_cursor_tracker_end() {
        let mut tracker = CursorTracker::new();
        assert_eq!(tracker.advance(Some(String::new())).unwrap(), None);
        assert_eq!(tracker.advance(None).unwrap(), None);
        assert_eq!(tracker.pages(), 2);
    }
}
