//! Vercel Blob provider implementation.
//!
//! Object storage. The whole store is listed with cursor pagination and
//! summarized in one pass: totals, quota use, and breakdowns by MIME type,
//! extension and directory.
//!
//! Environment: `BLOB_READ_WRITE_TOKEN`, optional `BLOB_QUOTA_BYTES`.

mod api;
mod fetcher;
mod models;

pub use api::{RawBlob, RawListResponse, BLOB_API_BASE};
pub use fetcher::BlobAdapter;
pub use models::{summarize, BlobCounts, BlobRecord, BlobSummary, Breakdown, Quota};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// Vercel Blob descriptor.
pub fn blob_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::VercelBlob,
        category: "Object storage",
        auth: AuthScheme::Bearer,
        api_base: BLOB_API_BASE,
        dashboard_url: "https://vercel.com/dashboard/stores",
        build: |config| into_shared(BlobAdapter::from_config(config)),
    }
}
