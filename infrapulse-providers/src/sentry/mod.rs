//! Sentry provider implementation.
//!
//! Error tracking. Projects are followed across `Link` pages; unresolved
//! issues come from the first page of the last 24h.
//!
//! Environment: `SENTRY_AUTH_TOKEN`, `SENTRY_ORG`.

mod api;
mod fetcher;
mod models;

pub use api::SENTRY_API_BASE;
pub use fetcher::SentryAdapter;
pub use models::{IssueRecord, ProjectRecord, SentryCounts, SentrySummary};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// Sentry descriptor.
pub fn sentry_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::Sentry,
        category: "Error tracking",
        auth: AuthScheme::Bearer,
        api_base: SENTRY_API_BASE,
        dashboard_url: "https://sentry.io",
        build: |config| into_shared(SentryAdapter::from_config(config)),
    }
}
