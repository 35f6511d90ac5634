//! Cloudflare provider implementation.
//!
//! CDN, DNS and edge compute. Zones are listed in full; the most recently
//! modified ones get DNS, SSL and 24h traffic detail. With an account id the
//! Workers scripts and R2 buckets are listed as well.
//!
//! Environment: `CLOUDFLARE_API_TOKEN`, optional `CLOUDFLARE_ACCOUNT_ID`.

mod api;
mod fetcher;
mod models;

pub use api::CLOUDFLARE_API_BASE;
pub use fetcher::CloudflareAdapter;
pub use models::{
    BucketRecord, BucketUsage, CloudflareCounts, CloudflareSummary, SslStatus, WorkerRecord,
    ZoneAnalytics, ZoneDetail, ZoneRecord,
};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// Cloudflare descriptor.
pub fn cloudflare_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Cloudflare,
        category: "CDN, DNS and edge compute",
        auth: AuthScheme::Bearer,
        api_base: CLOUDFLARE_API_BASE,
        dashboard_url: "https://dash.cloudflare.com",
        build: |config| into_shared(CloudflareAdapter::from_config(config)),
    }
}
