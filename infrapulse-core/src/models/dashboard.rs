//! Aggregated dashboard types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::ProviderKind;
use super::result::ProviderResult;

// ============================================================================
// Dashboard Outcome
// ============================================================================

/// Overall outcome of one fan-out.
///
/// "No providers configured" and "all providers failed" are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardOutcome {
    /// No provider has credentials in this environment.
    NoProvidersConfigured,
    /// Every configured provider failed.
    AllFailed,
    /// Some configured providers failed, others succeeded.
    Partial,
    /// Every configured provider succeeded.
    AllSucceeded,
}

impl DashboardOutcome {
    /// Derives the outcome from a set of results.
    pub fn from_results<'a, T: 'a>(results: impl IntoIterator<Item = &'a ProviderResult<T>>) -> Self {
        let mut with_credentials = 0usize;
        let mut failed = 0usize;

        for result in results {
            if result.has_credentials() {
                with_credentials += 1;
                if result.is_failed() {
                    failed += 1;
                }
            }
        }

        match (with_credentials, failed) {
            (0, _) => Self::NoProvidersConfigured,
            (n, f) if f == n => Self::AllFailed,
            (_, 0) => Self::AllSucceeded,
            _ => Self::Partial,
        }
    }
}

// ============================================================================
// Aggregated Dashboard
// ============================================================================

/// Mapping from provider to its result, built once per fan-out.
///
/// The map is keyed by provider so serialization is deterministic; no
/// ordering between provider completions is implied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedDashboard<T> {
    /// When the fan-out finished.
    pub generated_at: DateTime<Utc>,
    /// Derived overall outcome.
    pub outcome: DashboardOutcome,
    /// One entry per provider.
    pub providers: BTreeMap<ProviderKind, ProviderResult<T>>,
}

impl<T> AggregatedDashboard<T> {
    /// Builds the dashboard and derives its outcome.
    pub fn new(providers: BTreeMap<ProviderKind, ProviderResult<T>>) -> Self {
        let outcome = DashboardOutcome::from_results(providers.values());
        Self {
            generated_at: Utc::now(),
            outcome,
            providers,
        }
    }

    /// Number of provider entries.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if the dashboard has no entries.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Returns the result for one provider.
    pub fn get(&self, kind: ProviderKind) -> Option<&ProviderResult<T>> {
        self.providers.get(&kind)
    }

    /// Providers that failed.
    pub fn failed(&self) -> Vec<ProviderKind> {
        self.providers
            .iter()
            .filter(|(_, r)| r.is_failed())
            .map(|(k, _)| *k)
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::result::{ErrorDetail, ErrorKind};

    fn failed() -> ProviderResult<u32> {
        ProviderResult::failed(true, ErrorDetail::new(ErrorKind::Upstream, "boom"))
    }

    #[test]
    fn test_outcome_none_configured() {
        let results: Vec<ProviderResult<u32>> = vec![
            ProviderResult::not_configured("a"),
            ProviderResult::not_configured("b"),
        ];
        assert_eq!(
            DashboardOutcome::from_results(&results),
            DashboardOutcome::NoProvidersConfigured
        );

        let empty: Vec<ProviderResult<u32>> = Vec::new();
        assert_eq!(
            DashboardOutcome::from_results(&empty),
            DashboardOutcome::NoProvidersConfigured
        );
    }

    #[test]
    fn test_outcome_all_failed_is_distinct() {
        let results = vec![failed(), ProviderResult::not_configured("x"), failed()];
        assert_eq!(
            DashboardOutcome::from_results(&results),
            DashboardOutcome::AllFailed
        );
    }

    #[test]
    fn test_outcome_partial_and_success() {
        let partial = vec![failed(), ProviderResult::ready(1)];
        assert_eq!(
            DashboardOutcome::from_results(&partial),
            DashboardOutcome::Partial
        );

        let ok = vec![ProviderResult::ready(1), ProviderResult::not_configured("x")];
        assert_eq!(
            DashboardOutcome::from_results(&ok),
            DashboardOutcome::AllSucceeded
        );
    }

    #[test]
    fn test_dashboard_failed_list() {
        let mut map = BTreeMap::new();
        map.insert(ProviderKind::GitHub, ProviderResult::ready(1));
        map.insert(ProviderKind::UptimeRobot, failed());
        let dashboard = AggregatedDashboard::new(map);

        assert_eq!(dashboard.len(), 2);
        assert_eq!(dashboard.failed(), vec![ProviderKind::UptimeRobot]);
        assert_eq!(dashboard.outcome, DashboardOutcome::Partial);
    }
}
