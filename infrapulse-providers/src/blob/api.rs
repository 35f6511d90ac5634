//! Vercel Blob API schemas.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::normalize::flexible_u64;

// ============================================================================
// Constants
// ============================================================================

/// Vercel Blob API base URL.
pub const BLOB_API_BASE: &str = "https://blob.vercel-storage.com";

/// Objects requested per page.
pub const PAGE_LIMIT: u32 = 1000;

/// Value for the `x-api-version` header.
pub const API_VERSION: &str = "7";

// ============================================================================
// API Response Types
// ============================================================================

/// One page of the object listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListResponse {
    /// Objects on this page.
    #[serde(default)]
    pub blobs: Vec<RawBlob>,
    /// Cursor for the next page.
    #[serde(default)]
    pub cursor: Option<String>,
    /// Whether more pages exist.
    #[serde(default)]
    pub has_more: bool,
}

/// A stored object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlob {
    /// Public URL.
    pub url: String,
    /// Path inside the store.
    pub pathname: String,
    /// Size in bytes.
    #[serde(deserialize_with = "flexible_u64")]
    pub size: u64,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// MIME type, when the store recorded one.
    #[serde(default)]
    pub content_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_page() {
        let json = r#"{
            "blobs": [{
                "url": "https://x.public.blob.vercel-storage.com/a.png",
                "downloadUrl": "https://x.public.blob.vercel-storage.com/a.png?download=1",
                "pathname": "a.png",
                "size": 2048,
                "uploadedAt": "2024-05-01T10:00:00.000Z"
            }],
            "cursor": "abc",
            "hasMore": true
        }"#;
        let page: RawListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.blobs.len(), 1);
        assert_eq!(page.blobs[0].size, 2048);
        assert!(page.blobs[0].content_type.is_none());
        assert_eq!(page.cursor.as_deref(), Some("abc"));
        assert!(page.has_more);
    }

    #[test]
    fn test_parse_last_page() {
        let page: RawListResponse = serde_json::from_str(r#"{"blobs":[],"hasMore":false}"#).unwrap();
        assert!(page.cursor.is_none());
        assert!(!page.has_more);
    }
}
