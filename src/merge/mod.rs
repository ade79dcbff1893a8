//! Reconciles a fresh fetch with the previously stored snapshot of a feed.
//!
//! Only the reader-local `read` flag survives. Everything else, including
//! the item set itself, comes from the fresh fetch. Items that disappeared
//! upstream are dropped together with their read state.

use std::collections::HashSet;

use crate::domain::Feed;

/// Carry read flags from `old` over to `new`, matching items by id.
pub fn merge(old: &Feed, mut new: Feed) -> Feed {
    let read_ids: HashSet<&str> = old
        .items
        .iter()
        .filter(|item| item.read)
        .map(|item| item.id.as_str())
        .collect();

    for item in &mut new.items {
        item.read = read_ids.contains(item.id.as_str());
    }

    new
}

/// Number of items in `new` that `old` did not have.
pub fn new_item_count(old: &Feed, new: &Feed) -> usize {
    let known: HashSet<&str> = old.items.iter().map(|item| item.id.as_str()).collect();
    new.items
        .iter()
        .filter(|item| !known.contains(item.id.as_str()))
        .count()
}
