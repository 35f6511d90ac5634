//! Cloudinary provider implementation.
//!
//! Media CDN. Reports account usage and credits, plus the latest image
//! uploads when they can be listed.
//!
//! Environment: `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`,
//! `CLOUDINARY_API_SECRET`.

mod api;
mod fetcher;
mod models;

pub use api::CLOUDINARY_API_BASE;
pub use fetcher::CloudinaryAdapter;
pub use models::{AssetRecord, CloudinarySummary, CloudinaryUsage};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// Cloudinary descriptor.
pub fn cloudinary_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Cloudinary,
        category: "Media CDN",
        auth: AuthScheme::SignedQuery,
        api_base: CLOUDINARY_API_BASE,
        dashboard_url: "https://console.cloudinary.com",
        build: |config| into_shared(CloudinaryAdapter::from_config(config)),
    }
}
