//! Aggregation execution engine.
//!
//! Fans one query out to every registered platform, waits for all calls to
//! settle, then filters, ranks and truncates the merged listings.

use super::{CompareOutcome, SourceFailure};
use crate::error::PlatformError;
use crate::filters;
use crate::model::{Listing, SearchParams, SourceId};
use crate::{Platform, PlatformRegistry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Bound on each individual platform call. A platform that has not settled
/// by then is recorded as a timeout failure, same as any other failure.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Engine for executing one query across registered platforms.
///
/// Holds no per-query state; each call builds a private collection behind
/// the fan-out barrier, so no locking is involved. Dropping the returned
/// future drops every in-flight platform call with it.
pub struct Aggregator<'a> {
    registry: &'a PlatformRegistry,
    timeout_ms: u64,
}

impl<'a> Aggregator<'a> {
    /// Create an engine over a registry with the default per-platform timeout.
    pub fn new(registry: &'a PlatformRegistry) -> Self {
        Self {
            registry,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Query every registered platform concurrently and merge the survivors.
    ///
    /// Auction-only platforms are skipped unless `include_bids` is set. Each
    /// call settles independently; a slow or failing platform never blocks
    /// or fails the others, and even total failure yields a well-formed
    /// (empty) outcome rather than an error.
    pub async fn compare_across_sources(&self, params: &SearchParams) -> CompareOutcome {
        let start = Instant::now();

        let platforms: Vec<Arc<dyn Platform>> = self
            .registry
            .platforms()
            .iter()
            .filter(|p| params.include_bids || !p.auction_only())
            .cloned()
            .collect();

        let calls = platforms.iter().map(|platform| {
            let platform = Arc::clone(platform);
            let params = params.clone();
            let timeout_ms = self.timeout_ms;
            async move {
                let source = platform.id();
                (source, bounded_search(platform, &params, timeout_ms).await)
            }
        });

        // Barrier: ranking only ever sees the complete settled set.
        let settled = futures::future::join_all(calls).await;

        let mut outcome = CompareOutcome::new(&params.query);
        for (source, result) in settled {
            match result {
                Ok(listings) => {
                    let kept: Vec<Listing> = listings
                        .into_iter()
                        .filter(|l| filters::passes(l, params))
                        .collect();
                    debug!(source = %source, kept = kept.len(), "platform settled");
                    outcome.add_completed(source, kept);
                }
                Err(err) => {
                    warn!(
                        source = %source,
                        code = err.code_str(),
                        error = %err,
                        "platform failed, contributing zero listings"
                    );
                    outcome.add_failure(SourceFailure::from_error(source, &err));
                }
            }
        }

        rank(&mut outcome.listings, params.max_results);
        outcome.duration_ms = Some(start.elapsed().as_millis() as u64);
        outcome
    }

    /// Query a single platform, applying the same filter/rank/truncate
    /// pipeline. Unlike the fan-out there is no other platform to fall back
    /// on, so the platform's failure is propagated to the caller.
    pub async fn search_one_source(
        &self,
        source: SourceId,
        params: &SearchParams,
    ) -> Result<Vec<Listing>, PlatformError> {
        let platform = self
            .registry
            .get(source)
            .ok_or_else(|| PlatformError::UnknownSource(source.as_str().to_string()))?;

        let listings = bounded_search(platform, params, self.timeout_ms).await?;

        let mut kept: Vec<Listing> = listings
            .into_iter()
            .filter(|l| filters::passes(l, params))
            .collect();
        rank(&mut kept, params.max_results);
        Ok(kept)
    }
}

/// Search one platform, converting expiry of the time bound into a
/// `Timeout` error so the caller sees one failure shape either way.
async fn bounded_search(
    platform: Arc<dyn Platform>,
    params: &SearchParams,
    timeout_ms: u64,
) -> Result<Vec<Listing>, PlatformError> {
    let source = platform.id();
    match timeout(Duration::from_millis(timeout_ms), platform.search(params)).await {
        Ok(result) => result,
        Err(_) => Err(PlatformError::Timeout {
            source_id: source,
            elapsed_ms: timeout_ms,
        }),
    }
}

/// Total order over merged listings: ascending price. `sort_by_key` is
/// stable, so equal prices keep merge order (platform registration order,
/// then each platform's own return order).
fn rank(listings: &mut Vec<Listing>, cap: usize) {
    listings.sort_by_key(|l| l.price);
    listings.truncate(cap);
}
