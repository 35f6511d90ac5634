//! Provider registry for managing all provider descriptors.
//!
//! The registry provides static access to every provider's descriptor
//! and is the central point for looking providers up by kind or slug.

use std::collections::HashMap;
use std::sync::OnceLock;

use infrapulse_core::ProviderKind;

use crate::atlas::atlas_descriptor;
use crate::blob::blob_descriptor;
use crate::cloudflare::cloudflare_descriptor;
use crate::cloudinary::cloudinary_descriptor;
use crate::descriptor::ProviderDescriptor;
use crate::github::github_descriptor;
use crate::neon::neon_descriptor;
use crate::sentry::sentry_descriptor;
use crate::uptimerobot::uptimerobot_descriptor;
use crate::vercel::vercel_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all provider descriptors.
static DESCRIPTORS: OnceLock<Vec<ProviderDescriptor>> = OnceLock::new();

/// Static storage for slug to provider kind mapping.
static SLUG_MAP: OnceLock<HashMap<&'static str, ProviderKind>> = OnceLock::new();

/// Initializes all provider descriptors, in dashboard order.
fn init_descriptors() -> Vec<ProviderDescriptor> {
    vec![
        // Edge and hosting
        cloudflare_descriptor(),
        blob_descriptor(),
        vercel_descriptor(),
        // Databases
        atlas_descriptor(),
        neon_descriptor(),
        // Media
        cloudinary_descriptor(),
        // Source and operations
        github_descriptor(),
        sentry_descriptor(),
        uptimerobot_descriptor(),
    ]
}

fn build_slug_map(descriptors: &[ProviderDescriptor]) -> HashMap<&'static str, ProviderKind> {
    descriptors.iter().map(|d| (d.slug(), d.id)).collect()
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Global registry of all provider descriptors.
///
/// The registry is initialized lazily on first access and provides
/// thread-safe access to provider descriptors.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all provider descriptors.
    pub fn all() -> &'static [ProviderDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a provider descriptor by kind.
    pub fn get(id: ProviderKind) -> Option<&'static ProviderDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Looks up a provider by its URL slug.
    pub fn get_by_slug(slug: &str) -> Option<&'static ProviderDescriptor> {
        let kind = SLUG_MAP
            .get_or_init(|| build_slug_map(Self::all()))
            .get(slug)?;
        Self::get(*kind)
    }

    /// Returns the number of registered providers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all provider kinds.
    pub fn kinds() -> Vec<ProviderKind> {
        Self::all().iter().map(|d| d.id).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
