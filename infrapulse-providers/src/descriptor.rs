//! Provider descriptor system.
//!
//! A descriptor contains the static facts about a provider:
//! - Category and auth scheme (for listings)
//! - API base and dashboard URLs
//! - How to build its adapter from the configuration

use std::fmt;
use std::sync::Arc;

use infrapulse_core::{Config, ProviderKind};

use crate::adapter::ProviderAdapter;

// ============================================================================
// Auth Scheme
// ============================================================================

/// How a provider authenticates, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// Bearer token header.
    Bearer,
    /// Signed query parameters.
    SignedQuery,
    /// RFC 2617 Digest.
    Digest,
    /// API key in the form body.
    FormField,
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bearer => "bearer token",
            Self::SignedQuery => "signed query",
            Self::Digest => "digest",
            Self::FormField => "form field",
        })
    }
}

// ============================================================================
// Provider Descriptor
// ============================================================================

/// Function that builds a provider's adapter, if it is configured.
pub type AdapterBuilder = fn(&Config) -> Option<Arc<dyn ProviderAdapter>>;

/// Complete descriptor for a provider.
pub struct ProviderDescriptor {
    /// Provider identifier.
    pub id: ProviderKind,
    /// What kind of infrastructure it is.
    pub category: &'static str,
    /// How requests are authenticated.
    pub auth: AuthScheme,
    /// Default API base URL.
    pub api_base: &'static str,
    /// Where a human manages the account.
    pub dashboard_url: &'static str,
    /// Builds the adapter from the configuration.
    pub build: AdapterBuilder,
}

impl ProviderDescriptor {
    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    /// Returns the URL/CLI slug.
    pub fn slug(&self) -> &'static str {
        self.id.slug()
    }

    /// Builds the adapter, or `None` if credentials are missing.
    pub fn build_adapter(&self, config: &Config) -> Option<Arc<dyn ProviderAdapter>> {
        (self.build)(config)
    }
}

impl fmt::Debug for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDescriptor")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("auth", &self.auth)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

/// Erases a concrete adapter type.
pub fn into_shared<A: ProviderAdapter + 'static>(adapter: Option<A>) -> Option<Arc<dyn ProviderAdapter>> {
    adapter.map(|a| Arc::new(a) as Arc<dyn ProviderAdapter>)
}
