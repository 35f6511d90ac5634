//! Vercel Blob normalized summary.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::api::RawBlob;
use crate::normalize::{apportion_percent, round_to};

// ============================================================================
// Summary Types
// ============================================================================

/// Normalized Vercel Blob data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobSummary {
    /// Scalar counts.
    pub summary: BlobCounts,
    /// Usage against the configured ceiling.
    pub quota: Quota,
    /// Breakdown by MIME type.
    pub by_type: Vec<Breakdown>,
    /// Breakdown by file extension.
    pub by_extension: Vec<Breakdown>,
    /// Breakdown by parent directory.
    pub by_directory: Vec<Breakdown>,
    /// Most recent uploads, newest first.
    pub recent_uploads: Vec<BlobRecord>,
}

/// Scalar counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobCounts {
    /// Number of stored objects.
    pub total_files: u64,
    /// Total stored bytes.
    pub total_bytes: u64,
}

/// Storage use against the configured ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quota {
    /// Bytes in use.
    pub used_bytes: u64,
    /// Ceiling in bytes.
    pub limit_bytes: u64,
    /// `used / limit`, may exceed 1.
    pub fraction: f64,
    /// `fraction` as a percentage, one decimal.
    pub percent: f64,
}

/// One bucket of a breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    /// MIME type, extension or directory.
    pub key: String,
    /// Objects in the bucket.
    pub count: u64,
    /// Bytes in the bucket.
    pub bytes: u64,
    /// Share of total bytes (of total objects when the store holds 0 bytes).
    pub percentage: f64,
}

/// A recently uploaded object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobRecord {
    /// Path inside the store.
    pub pathname: String,
    /// Public URL.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// Upload time.
    pub uploaded_at: DateTime<Utc>,
    /// Resolved MIME type.
    pub content_type: String,
}

// ============================================================================
// Normalization
// ============================================================================

#[derive(Default)]
struct Tally {
    count: u64,
    bytes: u64,
}

/// Summarizes a full listing in a single pass.
#[allow(clippy::cast_precision_loss)]
pub fn summarize(blobs: &[RawBlob], limit_bytes: u64, recent_cap: usize) -> BlobSummary {
    let mut total_bytes = 0u64;
    let mut by_type: HashMap<String, Tally> = HashMap::new();
    let mut by_extension: HashMap<String, Tally> = HashMap::new();
    let mut by_directory: HashMap<String, Tally> = HashMap::new();

    for blob in blobs {
        total_bytes += blob.size;
        for (map, key) in [
            (&mut by_type, mime_type(blob)),
            (&mut by_extension, extension_of(&blob.pathname)),
            (&mut by_directory, directory_of(&blob.pathname)),
        ] {
            let tally = map.entry(key).or_default();
            tally.count += 1;
            tally.bytes += blob.size;
        }
    }

    let total_files = blobs.len() as u64;
    let fraction = if limit_bytes == 0 {
        0.0
    } else {
        total_bytes as f64 / limit_bytes as f64
    };

    let mut recent: Vec<&RawBlob> = blobs.iter().collect();
    recent.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    recent.truncate(recent_cap);

    BlobSummary {
        summary: BlobCounts {
            total_files,
            total_bytes,
        },
        quota: Quota {
            used_bytes: total_bytes,
            limit_bytes,
            fraction: round_to(fraction, 4),
            percent: round_to(fraction * 100.0, 1),
        },
        by_type: breakdown(by_type, total_bytes, total_files),
        by_extension: breakdown(by_extension, total_bytes, total_files),
        by_directory: breakdown(by_directory, total_bytes, total_files),
        recent_uploads: recent
            .into_iter()
            .map(|blob| BlobRecord {
                pathname: blob.pathname.clone(),
                url: blob.url.clone(),
                size: blob.size,
                uploaded_at: blob.uploaded_at,
                content_type: mime_type(blob),
            })
            .collect(),
    }
}

fn breakdown(map: HashMap<String, Tally>, total_bytes: u64, total_files: u64) -> Vec<Breakdown> {
    let mut entries: Vec<(String, Tally)> = map.into_iter().collect();
    entries.sort_by(|a, b| b.1.bytes.cmp(&a.1.bytes).then_with(|| a.0.cmp(&b.0)));

    let shares = if total_bytes > 0 {
        let bytes: Vec<u64> = entries.iter().map(|(_, t)| t.bytes).collect();
        apportion_percent(&bytes, total_bytes)
    } else {
        let counts: Vec<u64> = entries.iter().map(|(_, t)| t.count).collect();
        apportion_percent(&counts, total_files)
    };

    entries
        .into_iter()
        .zip(shares)
        .map(|((key, tally), percentage)| Breakdown {
            key,
            count: tally.count,
            bytes: tally.bytes,
            percentage,
        })
        .collect()
}

/// Recorded content type without parameters, else a guess from the extension.
fn mime_type(blob: &RawBlob) -> String {
    if let Some(content_type) = blob.content_type.as_deref() {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        if !essence.is_empty() {
            return essence.to_ascii_lowercase();
        }
    }

    let mime = match extension_of(&blob.pathname).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "zip" => "application/zip",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    };
    mime.to_string()
}

fn extension_of(pathname: &str) -> String {
    let file = pathname.rsplit('/').next().unwrap_or(pathname);
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => "(none)".to_string(),
    }
}

fn directory_of(pathname: &str) -> String {
    match pathname.trim_start_matches('/').rsplit_once('/') {
        Some((dir, _)) if !dir.is_empty() => dir.to_string(),
        _ => "/".to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn blob(pathname: &str, size: u64, minute: u32, content_type: Option<&str>) -> RawBlob {
        RawBlob {
            url: format!("https://store.example.com/{pathname}"),
            pathname: pathname.to_string(),
            size,
            uploaded_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
            content_type: content_type.map(str::to_string),
        }
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(extension_of("images/photo.JPG"), "jpg");
        assert_eq!(extension_of("README"), "(none)");
        assert_eq!(extension_of("dir/.env"), "(none)");
        assert_eq!(directory_of("images/2024/photo.jpg"), "images/2024");
        assert_eq!(directory_of("photo.jpg"), "/");
        assert_eq!(directory_of("/photo.jpg"), "/");
    }

    #[test]
    fn test_mime_resolution() {
        assert_eq!(mime_type(&blob("a.bin", 1, 0, Some("text/plain; charset=utf-8"))), "text/plain");
        assert_eq!(mime_type(&blob("a.webp", 1, 0, None)), "image/webp");
        assert_eq!(mime_type(&blob("a.xyz", 1, 0, None)), "application/octet-stream");
    }

    #[test]
    fn test_breakdowns_by_bytes() {
        let blobs = vec![
            blob("img/a.png", 600, 1, None),
            blob("img/b.png", 200, 2, None),
            blob("docs/c.pdf", 200, 3, None),
        ];
        let summary = summarize(&blobs, 10_000, 10);

        assert_eq!(summary.summary.total_files, 3);
        assert_eq!(summary.summary.total_bytes, 1000);
        assert_eq!(summary.by_type[0].key, "image/png");
        assert_eq!(summary.by_type[0].count, 2);
        assert_eq!(summary.by_type[0].percentage, 80.0);
        assert_eq!(summary.by_type[1].percentage, 20.0);
        assert_eq!(summary.by_directory[0].key, "img");
        assert_eq!(summary.by_extension[1].key, "pdf");
    }

    #[test]
    fn test_zero_bytes_falls_back_to_counts() {
        let blobs = vec![
            blob("a.txt", 0, 1, None),
            blob("b.txt", 0, 2, None),
            blob("c.json", 0, 3, None),
            blob("d.json", 0, 4, None),
        ];
        let summary = summarize(&blobs, 0, 10);
        assert!(summary.by_type.iter().all(|b| b.percentage == 50.0));
        assert_eq!(summary.quota.fraction, 0.0);
    }

    #[test]
    fn test_quota() {
        let blobs = vec![blob("a.txt", 256, 1, None)];
        let summary = summarize(&blobs, 1024, 10);
        assert_eq!(summary.quota.used_bytes, 256);
        assert_eq!(summary.quota.fraction, 0.25);
        assert_eq!(summary.quota.percent, 25.0);
    }

    #[test]
    fn test_recent_uploads_sorted_and_capped() {
        let blobs: Vec<RawBlob> = (0..15)
            .map(|i| blob(&format!("f{i}.txt"), 1, i, None))
            .collect();
        let summary = summarize(&blobs, 1024, 10);

        assert_eq!(summary.recent_uploads.len(), 10);
        assert_eq!(summary.recent_uploads[0].pathname, "f14.txt");
        assert!(summary
            .recent_uploads
            .windows(2)
            .all(|w| w[0].uploaded_at >= w[1].uploaded_at));
    }

    #[test]
    fn test_many_equal_buckets_sum_to_hundred() {
        let blobs: Vec<RawBlob> = ["png", "jpg", "pdf", "json", "txt", "csv"]
            .iter()
            .enumerate()
            .map(|(i, ext)| blob(&format!("dir{i}/file.{ext}"), 100, u32::try_from(i).unwrap(), None))
            .collect();
        let summary = summarize(&blobs, 10_000, 10);

        for breakdown in [&summary.by_type, &summary.by_extension, &summary.by_directory] {
            assert_eq!(breakdown.len(), 6);
            let tenths: f64 = breakdown.iter().map(|b| b.percentage * 10.0).sum();
            assert_eq!(tenths.round(), 1000.0);
            assert!(breakdown.iter().all(|b| b.percentage == 16.6 || b.percentage == 16.7));
        }
    }

    #[test]
    fn test_empty_store() {
        let summary = summarize(&[], 1024, 10);
        assert_eq!(summary.summary.total_files, 0);
        assert!(summary.by_type.is_empty());
        assert!(summary.recent_uploads.is_empty());
    }
}
