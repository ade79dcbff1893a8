use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::app::Result;
use crate::domain::Feed;
use crate::fetcher::FeedFetcher;
use crate::store::Store;

pub const DEFAULT_WORKERS: usize = 10;

/// Refreshes many feeds at once with a bounded number of in-flight fetches.
pub struct ParallelFetcher {
    fetcher: Arc<FeedFetcher>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<FeedFetcher>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<FeedFetcher>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Refresh every feed once, returning the number of new items per feed id.
    /// Feeds that appear more than once are refreshed a single time.
    pub async fn refresh_all<S: Store + Send + Sync + 'static>(
        &self,
        feeds: Vec<Feed>,
        store: Arc<S>,
    ) -> Vec<(String, Result<usize>)> {
        let mut seen = HashSet::new();
        let mut handles = Vec::new();

        for feed in feeds {
            if !seen.insert(feed.id.clone()) {
                continue;
            }

            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let store = store.clone();

            let handle = tokio::spawn(async move {
                // Never closed: acquire cannot fail here.
                let _permit = semaphore.acquire().await;

                let result = fetcher
                    .refresh(&*store, &feed.id)
                    .await
                    .map(|refreshed| refreshed.new_items);
                match &result {
                    Ok(count) => tracing::info!("Added {} new items from {}", count, feed.url),
                    Err(e) => tracing::debug!("Refresh of {} failed: {}", feed.url, e),
                }
                (feed.id, result)
            });

            handles.push(handle);
        }

        let mut results = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        results
    }
}
