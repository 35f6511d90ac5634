//! UptimeRobot provider implementation.
//!
//! Uptime monitoring. Monitors are paged with `offset`/`limit` and
//! summarized by status and average uptime.
//!
//! Environment: `UPTIMEROBOT_API_KEY`.

mod api;
mod fetcher;
mod models;

pub use api::UPTIMEROBOT_API_BASE;
pub use fetcher::UptimeRobotAdapter;
pub use models::{MonitorRecord, MonitorStatus, UptimeCounts, UptimeRatios, UptimeRobotSummary};

use infrapulse_core::ProviderKind;

use crate::descriptor::{into_shared, AuthScheme, ProviderDescriptor};

/// UptimeRobot descriptor.
pub fn uptimerobot_descriptor() -> ProviderDescriptor {
    ProviderDescriptor {
        id: ProviderKind::UptimeRobot,
        category: "Uptime monitoring",
        auth: AuthScheme::FormField,
        api_base: UPTIMEROBOT_API_BASE,
        dashboard_url: "https://dashboard.uptimerobot.com",
        build: |config| into_shared(UptimeRobotAdapter::from_config(config)),
    }
}
