//! # Brook
//!
//! A local, durable mirror of RSS/Atom feeds that keeps your read state
//! across re-fetches.
//!
//! ## Architecture
//!
//! ```text
//! Transport → Normalizer → Merge → Store
//! ```
//!
//! - [`fetcher`]: HTTP transport and the fetch/update/refresh operations
//! - [`normalizer`]: Converts RSS/Atom/JSON feeds to the domain model
//! - [`merge`]: Carries read flags from the stored snapshot to a fresh fetch
//! - [`store`]: One JSON record per feed, written atomically
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a feed
//! brook add https://blog.rust-lang.org/feed.xml
//!
//! # List feeds with unread counts
//! brook list
//!
//! # Re-fetch all feeds
//! brook update
//!
//! # Mark an item read (ids may be abbreviated)
//! brook read 3f2a91c0 9be4d1
//! ```

/// Application context and error types.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// the fetcher and the parallel refresher.
pub mod app;

/// Command-line interface using clap.
///
/// - `add <url>` - Subscribe to a feed
/// - `remove <feed>` - Unsubscribe
/// - `update` - Refresh all feeds
/// - `list [--items] [--unread]` - List feeds or items
/// - `read <feed> <item> [--unread]` - Change an item's read state
/// - `init` - Subscribe to the configured default feeds
/// - `watch` - Refresh periodically
pub mod cli;

/// Configuration loaded from `~/.config/brook/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`Feed`](domain::Feed): a subscription and its current items
/// - [`Item`](domain::Item): one entry, with its local read flag
/// - [`generate_id`](domain::generate_id): SHA-256 content-addressed ids
pub mod domain;

/// Feed retrieval.
///
/// - [`Transport`](fetcher::Transport): Async trait for raw document retrieval
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based transport
/// - [`FeedFetcher`](fetcher::FeedFetcher): fetch, update and refresh
/// - [`ParallelFetcher`](fetcher::parallel::ParallelFetcher): Concurrent refresh with semaphore
pub mod fetcher;

/// Read-state reconciliation between two snapshots of a feed.
pub mod merge;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom 0.3/1.0, and JSON Feed 1.0
/// into a [`Feed`](domain::Feed).
pub mod normalizer;

/// Durable per-feed persistence.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`JsonStore`](store::JsonStore): file-per-feed JSON implementation
pub mod store;
