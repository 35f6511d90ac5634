//! Neon provider implementation.
//!
//! Serverless Postgres hosting. All projects are listed; the most recently
//! updated ones are enriched with branches and compute endpoints.
//!
//! Environment: `NEON_API_KEY`.

mod api;
mod fetcher;
mod models;

pub use api::NEON_API_BASE;
pub use fetcher::NeonAdapter;
pub use models::{
    BranchRecord, EndpointRecord, NeonCounts, NeonProject, NeonProjectDetail, NeonSummary,
};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// Neon descriptor.
pub fn neon_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Neon,
        category: "Database hosting",
        auth: AuthScheme::Bearer,
        api_base: NEON_API_BASE,
        dashboard_url: "https://console.neon.tech",
        build: |config| into_shared(NeonAdapter::from_config(config)),
    }
}
