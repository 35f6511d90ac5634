//! Provider-related types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Provider Kind
// ============================================================================

/// Supported infrastructure provider kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Cloudflare (CDN, DNS, Workers, R2)
    Cloudflare,
    /// Vercel Blob object storage
    #[serde(rename = "blob")]
    VercelBlob,
    /// Vercel compute hosting and deployments
    Vercel,
    /// MongoDB Atlas database hosting
    Atlas,
    /// Neon serverless Postgres hosting
    Neon,
    /// Cloudinary media CDN
    Cloudinary,
    /// GitHub source control
    GitHub,
    /// Sentry error tracking
    Sentry,
    /// UptimeRobot uptime monitoring
    UptimeRobot,
}

impl ProviderKind {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cloudflare => "Cloudflare",
            Self::VercelBlob => "Vercel Blob",
            Self::Vercel => "Vercel",
            Self::Atlas => "MongoDB Atlas",
            Self::Neon => "Neon",
            Self::Cloudinary => "Cloudinary",
            Self::GitHub => "GitHub",
            Self::Sentry => "Sentry",
            Self::UptimeRobot => "UptimeRobot",
        }
    }

    /// Returns all available provider kinds.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::Cloudflare,
            Self::VercelBlob,
            Self::Vercel,
            Self::Atlas,
            Self::Neon,
            Self::Cloudinary,
            Self::GitHub,
            Self::Sentry,
            Self::UptimeRobot,
        ]
    }

    /// Returns the URL/CLI slug for this provider (lowercase, no spaces).
    ///
    /// Matches the serde representation.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Cloudflare => "cloudflare",
            Self::VercelBlob => "blob",
            Self::Vercel => "vercel",
            Self::Atlas => "atlas",
            Self::Neon => "neon",
            Self::Cloudinary => "cloudinary",
            Self::GitHub => "github",
            Self::Sentry => "sentry",
            Self::UptimeRobot => "uptimerobot",
        }
    }

    /// Looks up a provider by slug. A few common aliases are accepted.
    pub fn from_slug(slug: &str) -> Option<Self> {
        let slug = slug.trim().to_ascii_lowercase();
        let kind = match slug.as_str() {
            "mongodb" | "mongo" => Self::Atlas,
            "vercel-blob" | "vercelblob" => Self::VercelBlob,
            "uptime" => Self::UptimeRobot,
            other => return Self::all().iter().copied().find(|k| k.slug() == other),
        };
        Some(kind)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ProviderKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| CoreError::UnknownProvider(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
