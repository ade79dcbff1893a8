use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::{FeedFetcher, Transport};
use crate::store::JsonStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<JsonStore>,
    pub fetcher: Arc<FeedFetcher>,
    pub parallel_fetcher: ParallelFetcher,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let transport: Arc<dyn Transport + Send + Sync> = Arc::new(HttpFetcher::new()?);
        Self::with_transport(config, transport)
    }

    /// Wire the context around any transport; tests pass an in-memory one.
    pub fn with_transport(
        config: Config,
        transport: Arc<dyn Transport + Send + Sync>,
    ) -> Result<Self> {
        let store = Arc::new(JsonStore::new(&config.data_dir)?);
        let fetcher = Arc::new(FeedFetcher::new(transport));
        let parallel_fetcher = ParallelFetcher::with_workers(fetcher.clone(), config.workers);

        Ok(Self {
            config,
            store,
            fetcher,
            parallel_fetcher,
        })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.store.dir().to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::fetcher::testing::MockTransport;

    #[test]
    fn test_context_creates_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().join("feeds"),
            ..Config::default()
        };

        let ctx = AppContext::with_transport(config, Arc::new(MockTransport::new())).unwrap();
        assert!(ctx.data_dir().is_dir());
        assert_eq!(ctx.data_dir(), temp_dir.path().join("feeds"));
    }
}
