//! MongoDB Atlas provider implementation.
//!
//! Database hosting, authenticated with HTTP Digest. Projects are listed in
//! full and loaded concurrently; running dedicated clusters also get process
//! metrics (connections, disk, per-database size).
//!
//! Environment: `ATLAS_PUBLIC_KEY`, `ATLAS_PRIVATE_KEY`.

mod api;
mod fetcher;
mod models;

pub use api::ATLAS_API_BASE;
pub use fetcher::AtlasAdapter;
pub use models::{
    metrics_eligible, AlertRecord, AtlasCounts, AtlasSummary, ClusterMetrics, ClusterRecord,
    DatabaseSize, DatabaseUserRecord, DiskUsage, ProjectReport,
};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// MongoDB Atlas descriptor.
pub fn atlas_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Atlas,
        category: "Database hosting",
        auth: AuthScheme::Digest,
        api_base: ATLAS_API_BASE,
        dashboard_url: "https://cloud.mongodb.com",
        build: |config| into_shared(AtlasAdapter::from_config(config)),
    }
}
