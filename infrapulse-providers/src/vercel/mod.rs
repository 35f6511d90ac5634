//! Vercel provider implementation.
//!
//! Compute hosting and deployments, across one or more accounts. Each
//! account is fetched independently; one failing account does not hide the
//! others.
//!
//! Environment: `VERCEL_TOKEN` and/or `VERCEL_TOKEN_<NAME>`, optional
//! `VERCEL_TEAM_ID[_<NAME>]`.

mod api;
mod fetcher;
mod models;

pub use api::VERCEL_API_BASE;
pub use fetcher::{VercelAccount, VercelAdapter};
pub use models::{
    AccountReport, DeploymentRecord, DeploymentState, ProjectRecord, VercelCounts, VercelSummary,
};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// Vercel descriptor.
pub fn vercel_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Vercel,
        category: "Compute hosting",
        auth: AuthScheme::Bearer,
        api_base: VERCEL_API_BASE,
        dashboard_url: "https://vercel.com/dashboard",
        build: |config| into_shared(VercelAdapter::from_config(config)),
    }
}
