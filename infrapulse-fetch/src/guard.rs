//! Rate-limit guard for per-child detail fan-out.
//!
//! Listings are never truncated. Only the expensive per-child sub-requests
//! are capped: the first `cap` items (in the caller's ordering) are
//! enriched concurrently, and a failed enrichment leaves that child without
//! detail instead of failing the adapter.

use std::fmt::Display;
use std::future::Future;

use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

/// A listed item with optional per-child detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enriched<T, D> {
    /// The listed item.
    pub item: T,
    /// Detail, present only for enriched children that succeeded.
    pub detail: Option<D>,
}

impl<T, D> Enriched<T, D> {
    /// Splits into item and detail.
    pub fn into_parts(self) -> (T, Option<D>) {
        (self.item, self.detail)
    }
}

/// Enriches the first `cap` items concurrently; returns every item.
///
/// At most `min(items.len(), cap)` calls to `enrich` are made.
pub async fn enrich_top<T, D, E, F, Fut>(
    label: &str,
    items: Vec<T>,
    cap: usize,
    enrich: F,
) -> Vec<Enriched<T, D>>
where
    F: Fn(&T) -> Fut,
    Fut: Future<Output = Result<D, E>>,
    E: Display,
{
    let enriched = cap.min(items.len());
    let results = join_all(items[..enriched].iter().map(&enrich)).await;

    let mut results = results.into_iter();
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let detail = if index < enriched {
                match results.next() {
                    Some(Ok(detail)) => Some(detail),
                    Some(Err(e)) => {
                        debug!(label, index, error = %e, "Child enrichment failed, omitting detail");
                        None
                    }
                    None => None,
                }
            } else {
                None
            };
            Enriched { item, detail }
        })
        .collect()
}

/// Runs an optional sub-fetch, turning failure into `None`.
pub async fn optional<D, E, Fut>(label: &str, fetch: Fut) -> Option<D>
where
    Fut: Future<Output = Result<D, E>>,
    E: Display,
{
    match fetch.await {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(label, error = %e, "Optional sub-fetch failed, omitting section");
            None
        }
    }
}
