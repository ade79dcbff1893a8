use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::app::StoreError;
use crate::domain::Feed;
use crate::merge::merge;
use crate::store::locks::KeyedLocks;
use crate::store::{Store, StoreResult};

const RECORD_EXT: &str = "json";
const TEMP_SUFFIX: &str = ".json.tmp";

/// File-per-feed store: each feed lives in `<dir>/<id>.json`.
///
/// Records are replaced by writing a temporary file next to them and renaming
/// it into place, so a crash mid-write never leaves a truncated record.
/// Writes to the same id are serialized through a per-id lock.
pub struct JsonStore {
    dir: PathBuf,
    locks: KeyedLocks,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;
        Ok(Self {
            dir,
            locks: KeyedLocks::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", id, RECORD_EXT))
    }

    fn read_record(&self, id: &str) -> StoreResult<Feed> {
        if !is_valid_key(id) {
            return Err(StoreError::FeedNotFound(id.to_string()));
        }

        let path = self.record_path(id);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::FeedNotFound(id.to_string()))
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };

        serde_json::from_slice(&data).map_err(|source| StoreError::Corrupt {
            id: id.to_string(),
            source,
        })
    }

    /// Caller must hold the lock for `feed.id`.
    fn write_record(&self, feed: &mut Feed) -> StoreResult<()> {
        feed.last_updated = Utc::now();
        let data = serde_json::to_vec_pretty(&*feed)?;

        let path = self.record_path(&feed.id);
        let tmp_path = self.dir.join(format!("{}{}", feed.id, TEMP_SUFFIX));

        if let Err(e) = write_synced(&tmp_path, &data) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(tmp_path, e));
        }

        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(path, e));
        }

        tracing::debug!("Saved feed {} ({} items)", feed.id, feed.items.len());
        Ok(())
    }
}

impl Store for JsonStore {
    fn save(&self, feed: &mut Feed) -> StoreResult<()> {
        validate(feed)?;
        self.locks.with_lock(&feed.id.clone(), || self.write_record(feed))
    }

    fn get_by_id(&self, id: &str) -> StoreResult<Feed> {
        self.read_record(id)
    }

    fn get_all(&self) -> StoreResult<Vec<Feed>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let mut feeds = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != RECORD_EXT) {
                continue;
            }

            let feed = fs::read(&path)
                .map_err(|e| e.to_string())
                .and_then(|data| serde_json::from_slice::<Feed>(&data).map_err(|e| e.to_string()));

            match feed {
                Ok(feed) => feeds.push(feed),
                Err(e) => {
                    tracing::warn!("Skipping unreadable feed record {}: {}", path.display(), e);
                }
            }
        }

        feeds.sort_by(|a, b| {
            a.display_title()
                .cmp(b.display_title())
                .then_with(|| a.url.cmp(&b.url))
        });
        Ok(feeds)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        if !is_valid_key(id) {
            return Err(StoreError::FeedNotFound(id.to_string()));
        }

        self.locks.with_lock(id, || {
            let path = self.record_path(id);
            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("Deleted feed {}", id);
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    Err(StoreError::FeedNotFound(id.to_string()))
                }
                Err(e) => Err(StoreError::io(path, e)),
            }
        })
    }

    fn set_item_read(&self, feed_id: &str, item_id: &str, read: bool) -> StoreResult<()> {
        if !is_valid_key(feed_id) {
            return Err(StoreError::FeedNotFound(feed_id.to_string()));
        }

        self.locks.with_lock(feed_id, || -> StoreResult<()> {
            let mut feed = self.read_record(feed_id)?;

            let item = feed
                .items
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or_else(|| StoreError::ItemNotFound {
                    feed_id: feed_id.to_string(),
                    item_id: item_id.to_string(),
                })?;
            item.read = read;

            self.write_record(&mut feed)
        })
    }

    fn merge_and_save(&self, fresh: Feed) -> StoreResult<Feed> {
        validate(&fresh)?;
        let id = fresh.id.clone();

        self.locks.with_lock(&id, || -> StoreResult<Feed> {
            // A record deleted while the fetch was in flight stays deleted.
            let old = self.read_record(&id)?;
            let mut merged = merge(&old, fresh);
            self.write_record(&mut merged)?;
            Ok(merged)
        })
    }
}

fn validate(feed: &Feed) -> StoreResult<()> {
    if feed.id.is_empty() {
        return Err(StoreError::Validation("feed id cannot be empty".into()));
    }
    if !is_valid_key(&feed.id) {
        return Err(StoreError::Validation(format!(
            "feed id {:?} is not a valid record key",
            feed.id
        )));
    }
    Ok(())
}

/// Keys become file names, so only a conservative character set is allowed.
fn is_valid_key(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
