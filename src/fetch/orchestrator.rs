//! Batch orchestration - concurrent fan-out/fan-in of title lookups
//!
//! One batch spawns one task per address. Tasks complete in any order;
//! each carries its input index so results are assembled back into input
//! order once every task has settled. Nothing is shared between batches.

use crate::config::FetcherSettings;
use crate::fetch::{FetchResult, Fetcher, FetcherConfig};
use crate::ScoutError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Settlement tracking for a single batch
///
/// A batch is pending while any fetch is outstanding and complete once all
/// of them have settled.
#[derive(Debug)]
struct BatchProgress {
    slots: Vec<Option<FetchResult>>,
    settled: usize,
}

impl BatchProgress {
    fn new(total: usize) -> Self {
        Self {
            slots: (0..total).map(|_| None).collect(),
            settled: 0,
        }
    }

    fn record(&mut self, index: usize, result: FetchResult) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.replace(result).is_none() {
                self.settled += 1;
            }
        }
    }

    fn outstanding(&self) -> usize {
        self.slots.len() - self.settled
    }

    fn is_complete(&self) -> bool {
        self.outstanding() == 0
    }

    fn into_results(self) -> Vec<FetchResult> {
        self.slots.into_iter().flatten().collect()
    }
}

/// Runs batches of lookups concurrently and returns results in input order
#[derive(Debug, Clone)]
pub struct Orchestrator {
    fetcher: Arc<Fetcher>,
    max_concurrent: Option<usize>,
}

impl Orchestrator {
    /// Creates an orchestrator
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The fetcher used for every address
    /// * `max_concurrent` - Per-batch ceiling on fetches in flight;
    ///   `None` or `Some(0)` means unbounded
    pub fn new(fetcher: Fetcher, max_concurrent: Option<usize>) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            max_concurrent: max_concurrent.filter(|limit| *limit > 0),
        }
    }

    /// Creates an orchestrator from the `[fetcher]` configuration section
    pub fn from_settings(settings: &FetcherSettings) -> Result<Self, ScoutError> {
        let fetcher = Fetcher::new(FetcherConfig::from(settings))?;
        Ok(Self::new(fetcher, Some(settings.max_concurrent_fetches)))
    }

    pub fn max_concurrent(&self) -> Option<usize> {
        self.max_concurrent
    }

    /// Fetches every address concurrently and waits for all of them
    ///
    /// `result[i]` always answers `addresses[i]`. Individual failures are
    /// already folded into the sentinel title by the fetcher, so the only
    /// error here is a fetch task that panicked or was cancelled.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<FetchResult>)` - One result per address, in input order
    /// * `Err(ScoutError::Batch)` - A fetch task did not run to completion
    pub async fn fetch_all(&self, addresses: Vec<String>) -> Result<Vec<FetchResult>, ScoutError> {
        if addresses.is_empty() {
            return Ok(Vec::new());
        }

        let total = addresses.len();
        let started = Instant::now();
        let limiter = self
            .max_concurrent
            .map(|limit| Arc::new(Semaphore::new(limit)));

        tracing::info!(
            "Fetching titles for {} address(es), concurrency {}",
            total,
            self.max_concurrent
                .map_or_else(|| "unbounded".to_string(), |limit| limit.to_string())
        );

        let mut join_set = JoinSet::new();
        for (index, address) in addresses.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = limiter.clone();
            join_set.spawn(async move {
                // The semaphore is never closed, so acquiring only waits.
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                (index, fetcher.fetch(&address).await)
            });
        }

        let mut progress = BatchProgress::new(total);
        while let Some(joined) = join_set.join_next().await {
            let (index, result) = joined.map_err(|e| {
                tracing::error!("Fetch task failed: {}", e);
                ScoutError::Batch(e)
            })?;
            progress.record(index, result);
            tracing::trace!("{} of {} fetches outstanding", progress.outstanding(), total);
        }

        debug_assert!(progress.is_complete());
        let results = progress.into_results();

        tracing::info!(
            "Batch of {} complete in {:?} ({} without a title)",
            total,
            started.elapsed(),
            results.iter().filter(|r| r.title.is_no_response()).count()
        );

        Ok(results)
    }
}
