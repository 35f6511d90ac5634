//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use infrapulse_core::Config;
use infrapulse_fetch::{FetchContext, FetchError};
use infrapulse_providers::Aggregator;

use crate::session::{SessionVerifier, StaticTokenVerifier};

/// State shared by every handler.
pub struct AppState {
    /// Registry entries resolved against the configuration.
    pub aggregator: Aggregator,
    /// Shared HTTP client and timing settings.
    pub ctx: FetchContext,
    /// Decides who may see the dashboard.
    pub verifier: Arc<dyn SessionVerifier>,
    /// When the server started.
    pub start_time: Instant,
}

impl AppState {
    /// Builds the state from the configuration, using the static admin token.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let verifier = StaticTokenVerifier::new(config.server.admin_token.clone());
        Ok(Self::new(
            Aggregator::from_config(config),
            FetchContext::from_config(config)?,
            Arc::new(verifier),
        ))
    }

    /// Builds the state from its parts.
    pub fn new(aggregator: Aggregator, ctx: FetchContext, verifier: Arc<dyn SessionVerifier>) -> Self {
        Self {
            aggregator,
            ctx,
            verifier,
            start_time: Instant::now(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("aggregator", &self.aggregator)
            .field("start_time", &self.start_time)
            .finish_non_exhaustive()
    }
}
