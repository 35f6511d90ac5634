//! The provider adapter contract.

use async_trait::async_trait;
use infrapulse_core::ProviderKind;
use infrapulse_fetch::FetchContext;

use crate::error::ProviderError;
use crate::summary::ProviderSummary;

/// One external provider: authentication, pagination and normalization.
///
/// Adapters are built from the configuration with their credentials and
/// hold no mutable state, so one instance may serve concurrent calls.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter serves.
    fn kind(&self) -> ProviderKind;

    /// Fetches and normalizes the provider's data.
    async fn fetch(&self, ctx: &FetchContext) -> Result<ProviderSummary, ProviderError>;
}
