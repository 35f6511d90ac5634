//! Fan-out aggregation across every provider.
//!
//! Each configured adapter runs in its own tokio task under the adapter
//! deadline. A failure, timeout or panic in one task becomes that
//! provider's failed result and never touches the others.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use infrapulse_core::{AggregatedDashboard, Config, ErrorKind, ProviderKind, ProviderResult};
use infrapulse_fetch::FetchContext;
use tokio::task::JoinError;
use tracing::{debug, error, info, instrument, warn};

use crate::adapter::ProviderAdapter;
use crate::error::ProviderError;
use crate::registry::ProviderRegistry;
use crate::summary::ProviderSummary;

/// The aggregated dashboard of normalized summaries.
pub type Dashboard = AggregatedDashboard<ProviderSummary>;

// ============================================================================
// Provider Entry
// ============================================================================

/// One registry entry resolved against the configuration.
#[derive(Clone)]
pub struct ProviderEntry {
    /// Which provider.
    pub kind: ProviderKind,
    /// The adapter, if credentials were present.
    pub adapter: Option<Arc<dyn ProviderAdapter>>,
    /// What to set when the adapter is missing.
    pub remediation: String,
}

impl ProviderEntry {
    /// Returns true if the provider has an adapter.
    pub fn is_configured(&self) -> bool {
        self.adapter.is_some()
    }
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("kind", &self.kind)
            .field("configured", &self.is_configured())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Runs provider adapters concurrently and collects their results.
#[derive(Debug, Clone)]
pub struct Aggregator {
    entries: Vec<ProviderEntry>,
}

impl Aggregator {
    /// Resolves every registered provider against the configuration.
    pub fn from_config(config: &Config) -> Self {
        let entries = ProviderRegistry::all()
            .iter()
            .map(|desc| ProviderEntry {
                kind: desc.id,
                adapter: desc.build_adapter(config),
                remediation: config.resolution(desc.id).remediation(desc.id),
            })
            .collect();
        Self { entries }
    }

    /// Creates an aggregator over explicit entries.
    pub fn with_entries(entries: Vec<ProviderEntry>) -> Self {
        Self { entries }
    }

    /// Replaces (or adds) the adapter for one provider.
    #[must_use]
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        let kind = adapter.kind();
        match self.entries.iter_mut().find(|e| e.kind == kind) {
            Some(entry) => entry.adapter = Some(adapter),
            None => self.entries.push(ProviderEntry {
                kind,
                adapter: Some(adapter),
                remediation: String::new(),
            }),
        }
        self
    }

    /// Keeps only the given providers.
    #[must_use]
    pub fn only(mut self, kinds: &[ProviderKind]) -> Self {
        self.entries.retain(|e| kinds.contains(&e.kind));
        self
    }

    /// Returns the resolved entries.
    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    /// Returns the providers that have adapters.
    pub fn configured(&self) -> Vec<ProviderKind> {
        self.entries
            .iter()
            .filter(|e| e.is_configured())
            .map(|e| e.kind)
            .collect()
    }

    /// Runs every configured adapter concurrently.
    ///
    /// Every entry is represented in the result, configured or not.
    #[instrument(skip(self, ctx))]
    pub async fn run(&self, ctx: &FetchContext) -> Dashboard {
        let started = Instant::now();
        let mut providers = BTreeMap::new();
        let mut tasks = Vec::new();

        for entry in &self.entries {
            match &entry.adapter {
                Some(adapter) => {
                    let kind = entry.kind;
                    let handle = spawn_adapter(Arc::clone(adapter), ctx.clone());
                    tasks.push((kind, handle));
                }
                None => {
                    debug!(provider = %entry.kind, "Provider not configured");
                    providers.insert(entry.kind, ProviderResult::not_configured(&entry.remediation));
                }
            }
        }

        let kinds: Vec<ProviderKind> = tasks.iter().map(|(kind, _)| *kind).collect();
        let joined = futures::future::join_all(tasks.into_iter().map(|(_, handle)| handle)).await;

        for (kind, outcome) in kinds.into_iter().zip(joined) {
            providers.insert(kind, settle(kind, outcome));
        }

        let dashboard = AggregatedDashboard::new(providers);
        info!(
            providers = dashboard.len(),
            failed = dashboard.failed().len(),
            outcome = ?dashboard.outcome,
            elapsed = ?started.elapsed(),
            "Fan-out complete"
        );
        dashboard
    }

    /// Runs a single provider, or returns `None` if it is not registered.
    #[instrument(skip(self, ctx))]
    pub async fn run_one(
        &self,
        kind: ProviderKind,
        ctx: &FetchContext,
    ) -> Option<ProviderResult<ProviderSummary>> {
        let entry = self.entries.iter().find(|e| e.kind == kind)?;
        let Some(adapter) = &entry.adapter else {
            debug!(provider = %kind, "Provider not configured");
            return Some(ProviderResult::not_configured(&entry.remediation));
        };

        let outcome = spawn_adapter(Arc::clone(adapter), ctx.clone()).await;
        Some(settle(kind, outcome))
    }
}

type AdapterOutcome = Result<ProviderSummary, ProviderError>;

fn spawn_adapter(
    adapter: Arc<dyn ProviderAdapter>,
    ctx: FetchContext,
) -> tokio::task::JoinHandle<AdapterOutcome> {
    tokio::spawn(async move {
        let deadline = ctx.adapter_deadline();
        match tokio::time::timeout(deadline, adapter.fetch(&ctx)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(deadline)),
        }
    })
}

fn settle(kind: ProviderKind, outcome: Result<AdapterOutcome, JoinError>) -> ProviderResult<ProviderSummary> {
    let result = outcome.unwrap_or_else(|join_error| {
        let reason = if join_error.is_panic() {
            "adapter panicked".to_string()
        } else {
            join_error.to_string()
        };
        Err(ProviderError::Internal(reason))
    });

    match result {
        Ok(summary) => ProviderResult::ready(summary),
        Err(err) => {
            if err.kind() == ErrorKind::Authentication {
                warn!(provider = %kind, error = %err, "Provider rejected credentials");
            } else {
                error!(provider = %kind, error = %err, "Provider fetch failed");
            }
            err.into_result(kind)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
