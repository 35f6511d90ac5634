//! The union of all normalized provider summaries.

use infrapulse_core::ProviderKind;
use serde::Serialize;

use crate::atlas::AtlasSummary;
use crate::blob::BlobSummary;
use crate::cloudflare::CloudflareSummary;
use crate::cloudinary::CloudinarySummary;
use crate::github::GitHubSummary;
use crate::neon::NeonSummary;
use crate::sentry::SentrySummary;
use crate::uptimerobot::UptimeRobotSummary;
use crate::vercel::VercelSummary;

/// A normalized summary from any provider.
///
/// Serialized untagged: the provider is implied by the dashboard key or
/// the endpoint that returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderSummary {
    /// Cloudflare zones, workers and R2.
    Cloudflare(CloudflareSummary),
    /// Vercel Blob storage breakdown.
    VercelBlob(BlobSummary),
    /// Vercel projects and deployments.
    Vercel(VercelSummary),
    /// MongoDB Atlas projects and clusters.
    Atlas(AtlasSummary),
    /// Neon projects.
    Neon(NeonSummary),
    /// Cloudinary usage.
    Cloudinary(CloudinarySummary),
    /// GitHub repositories, runs and alerts.
    GitHub(GitHubSummary),
    /// Sentry projects and issues.
    Sentry(SentrySummary),
    /// UptimeRobot monitors.
    UptimeRobot(UptimeRobotSummary),
}

impl ProviderSummary {
    /// The provider that produced this summary.
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Cloudflare(_) => ProviderKind::Cloudflare,
            Self::VercelBlob(_) => ProviderKind::VercelBlob,
            Self::Vercel(_) => ProviderKind::Vercel,
            Self::Atlas(_) => ProviderKind::Atlas,
            Self::Neon(_) => ProviderKind::Neon,
            Self::Cloudinary(_) => ProviderKind::Cloudinary,
            Self::GitHub(_) => ProviderKind::GitHub,
            Self::Sentry(_) => ProviderKind::Sentry,
            Self::UptimeRobot(_) => ProviderKind::UptimeRobot,
        }
    }
}

macro_rules! impl_from_summary {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ProviderSummary {
                fn from(summary: $ty) -> Self {
                    Self::$variant(summary)
                }
            }
        )*
    };
}

impl_from_summary!(
    Cloudflare => CloudflareSummary,
    VercelBlob => BlobSummary,
    Vercel => VercelSummary,
    Atlas => AtlasSummary,
    Neon => NeonSummary,
    Cloudinary => CloudinarySummary,
    GitHub => GitHubSummary,
    Sentry => SentrySummary,
    UptimeRobot => UptimeRobotSummary,
);
