pub mod http_fetcher;
pub mod parallel;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::app::{FetchError, Result};
use crate::domain::Feed;
use crate::merge::{merge, new_item_count};
use crate::normalizer::Normalizer;
use crate::store::Store;

/// Retrieves the raw bytes of a feed document.
///
/// Timeouts, redirects and status handling belong to the implementation.
/// Every failure surfaces as [`FetchError::Network`].
#[async_trait]
pub trait Transport {
    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Outcome of refreshing a stored feed.
#[derive(Debug)]
pub struct Refreshed {
    pub feed: Feed,
    /// Items the previous snapshot did not contain.
    pub new_items: usize,
}

/// Fetches feeds and turns them into canonical [`Feed`]s. Never touches the
/// store, except through [`FeedFetcher::refresh`].
pub struct FeedFetcher {
    transport: Arc<dyn Transport + Send + Sync>,
    normalizer: Normalizer,
}

impl FeedFetcher {
    pub fn new(transport: Arc<dyn Transport + Send + Sync>) -> Self {
        Self {
            transport,
            normalizer: Normalizer::new(),
        }
    }

    pub async fn fetch(&self, url: &str) -> std::result::Result<Feed, FetchError> {
        let body = self.transport.get(url).await?;
        self.normalizer.normalize(url, &body, Utc::now())
    }

    /// Re-fetch `old.url` and carry `old`'s read flags over.
    pub async fn update(&self, old: &Feed) -> std::result::Result<Feed, FetchError> {
        let fresh = self.fetch(&old.url).await?;
        Ok(merge(old, fresh))
    }

    /// Re-fetch a stored feed and merge it into the store.
    ///
    /// The merge runs against the record as it is at save time, so read
    /// marks made while the fetch was in flight are kept.
    pub async fn refresh<S>(&self, store: &S, feed_id: &str) -> Result<Refreshed>
    where
        S: Store + ?Sized,
    {
        let old = store.get_by_id(feed_id)?;
        let fresh = self.fetch(&old.url).await?;
        let new_items = new_item_count(&old, &fresh);

        let feed = store.merge_and_save(fresh)?;
        tracing::debug!("Refreshed {}: {} new items", feed.url, new_items);

        Ok(Refreshed { feed, new_items })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory transport serving canned documents. Unknown URLs fail
    /// with a network error.
    #[derive(Default)]
    pub(crate) struct MockTransport {
        docs: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MockTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn serve(&self, url: &str, body: &str) {
            self.docs
                .lock()
                .unwrap()
                .insert(url.to_string(), body.as_bytes().to_vec());
        }

        pub(crate) fn remove(&self, url: &str) {
            self.docs.lock().unwrap().remove(url);
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            self.docs.lock().unwrap().get(url).cloned().ok_or_else(|| {
                FetchError::network(
                    url,
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "unreachable"),
                )
            })
        }
    }

    pub(crate) fn rss(title: &str, items: &[(&str, &str)]) -> String {
        let items: String = items
            .iter()
            .map(|(guid, title)| {
                format!(
                    "<item><title>{title}</title><link>https://example.com/{guid}</link>\
                     <guid>{guid}</guid><description>{title} body</description></item>"
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>{title}</title><link>https://example.com</link>
<description>Feed about {title}</description>{items}</channel></rss>"#
        )
    }
}
