// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # infrapulse Providers
//!
//! Provider adapters and the fan-out aggregator.
//!
//! Each provider module includes:
//!
//! - **api**: raw upstream response schemas and constants
//! - **models**: normalized summaries and the pure normalization step
//! - **fetcher**: the adapter (authentication, pagination, enrichment)
//! - **Descriptor**: static facts used by the registry and listings
//!
//! ## Supported Providers (9 total)
//!
//! | Provider | Category | Auth |
//! |----------|----------|------|
//! | Cloudflare | CDN, DNS and edge compute | Bearer |
//! | Vercel Blob | Object storage | Bearer |
//! | Vercel | Compute hosting | Bearer (multi-account) |
//! | MongoDB Atlas | Database hosting | Digest |
//! | Neon | Database hosting | Bearer |
//! | Cloudinary | Media CDN | Signed query |
//! | GitHub | Source control | Bearer |
//! | Sentry | Error tracking | Bearer |
//! | UptimeRobot | Uptime monitoring | Form field |
//!
//! ## Usage
//!
//! ```ignore
//! use infrapulse_core::Config;
//! use infrapulse_fetch::FetchContext;
//! use infrapulse_providers::Aggregator;
//!
//! let config = Config::load()?;
//! let ctx = FetchContext::from_config(&config)?;
//! let dashboard = Aggregator::from_config(&config).run(&ctx).await;
//! ```

pub mod adapter;
pub mod aggregate;
pub mod descriptor;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod summary;

// Provider modules (alphabetical)
pub mod atlas;
pub mod blob;
pub mod cloudflare;
pub mod cloudinary;
pub mod github;
pub mod neon;
pub mod sentry;
pub mod uptimerobot;
pub mod vercel;

// Re-export key types
pub use adapter::ProviderAdapter;
pub use aggregate::{Aggregator, Dashboard, ProviderEntry};
pub use descriptor::{AuthScheme, ProviderDescriptor};
pub use error::ProviderError;
pub use registry::ProviderRegistry;
pub use summary::ProviderSummary;

// Re-export provider descriptors
pub use atlas::atlas_descriptor;
pub use blob::blob_descriptor;
pub use cloudflare::cloudflare_descriptor;
pub use cloudinary::cloudinary_descriptor;
pub use github::github_descriptor;
pub use neon::neon_descriptor;
pub use sentry::sentry_descriptor;
pub use uptimerobot::uptimerobot_descriptor;
pub use vercel::vercel_descriptor;

// Re-export adapters
pub use atlas::AtlasAdapter;
pub use blob::BlobAdapter;
pub use cloudflare::CloudflareAdapter;
pub use cloudinary::CloudinaryAdapter;
pub use github::GitHubAdapter;
pub use neon::NeonAdapter;
pub use sentry::SentryAdapter;
pub use uptimerobot::UptimeRobotAdapter;
pub use vercel::VercelAdapter;
