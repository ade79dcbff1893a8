pub mod json;
mod locks;

use crate::app::StoreError;
use crate::domain::Feed;

pub use json::JsonStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable keyed collection of feed records, one record per feed id.
pub trait Store {
    /// Stamp `last_updated` and overwrite the record for `feed.id`.
    fn save(&self, feed: &mut Feed) -> StoreResult<()>;
    fn get_by_id(&self, id: &str) -> StoreResult<Feed>;
    /// Every readable record. Malformed records are skipped, not reported.
    fn get_all(&self) -> StoreResult<Vec<Feed>>;
    fn delete(&self, id: &str) -> StoreResult<()>;

    fn update(&self, feed: &mut Feed) -> StoreResult<()> {
        self.save(feed)
    }

    // Item state
    fn set_item_read(&self, feed_id: &str, item_id: &str, read: bool) -> StoreResult<()>;

    fn mark_item_read(&self, feed_id: &str, item_id: &str) -> StoreResult<()> {
        self.set_item_read(feed_id, item_id, true)
    }

    /// Merge `fresh` against the stored record for the same id and save the
    /// result. Fails with `FeedNotFound` when there is no stored record, so a
    /// feed removed mid-refresh is not written back.
    fn merge_and_save(&self, fresh: Feed) -> StoreResult<Feed>;
}
