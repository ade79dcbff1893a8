use std::time::Duration;

use url::Url;

use crate::app::{AppContext, BrookError, Result, StoreError};
use crate::domain::Feed;
use crate::store::Store;

pub async fn add_feed(ctx: &AppContext, url: &str) -> Result<()> {
    Url::parse(url)?;

    let id = Feed::id_for_url(url);
    match ctx.store.get_by_id(&id) {
        Ok(_) => {
            println!("Feed already exists: {}", url);
            return Ok(());
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e.into()),
    }

    let mut feed = ctx.fetcher.fetch(url).await?;
    ctx.store.save(&mut feed)?;

    println!("Added feed: {}", feed.display_title());
    println!("Fetched {} items", feed.items.len());
    Ok(())
}

pub fn remove_feed(ctx: &AppContext, target: &str) -> Result<()> {
    let feed = resolve_feed(ctx, target)?;
    ctx.store.delete(&feed.id)?;
    println!("Removed feed: {}", feed.display_title());
    Ok(())
}

/// Refresh every stored feed. Per-feed failures are reported, not returned.
pub async fn update_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = ctx.store.get_all()?;

    if feeds.is_empty() {
        println!("No feeds to update");
        return Ok(());
    }

    println!("Updating {} feeds...", feeds.len());

    let titles: std::collections::HashMap<String, String> = feeds
        .iter()
        .map(|f| (f.id.clone(), f.display_title().to_string()))
        .collect();

    let results = ctx
        .parallel_fetcher
        .refresh_all(feeds, ctx.store.clone())
        .await;

    let mut total_new = 0;
    let mut errors = 0;

    for (feed_id, result) in results {
        let title = titles.get(&feed_id).map(String::as_str).unwrap_or(&feed_id);
        match result {
            Ok(count) => {
                total_new += count;
                if count > 0 {
                    println!("  {} new items from {}", count, title);
                }
            }
            Err(e) => {
                errors += 1;
                eprintln!("  Error updating {}: {}{}", title, e, retry_hint(&e));
            }
        }
    }

    println!("Update complete: {} new items, {} errors", total_new, errors);
    Ok(())
}

pub fn list_feeds(ctx: &AppContext) -> Result<()> {
    let feeds = ctx.store.get_all()?;

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in feeds {
        println!(
            "{}  [{}/{}] {}",
            short_id(&feed.id),
            feed.unread_count(),
            feed.items.len(),
            feed.display_title()
        );
        println!("          {}", feed.url);
    }

    Ok(())
}

pub fn list_items(ctx: &AppContext, unread_only: bool) -> Result<()> {
    let feeds = ctx.store.get_all()?;
    let mut shown = 0;

    for feed in feeds {
        let items: Vec<_> = feed
            .items
            .iter()
            .filter(|item| !unread_only || !item.read)
            .collect();
        if items.is_empty() {
            continue;
        }

        println!("{} ({})", feed.display_title(), short_id(&feed.id));
        for item in items {
            let marker = if item.read { " " } else { "*" };
            println!(
                "  {} {}  {}  {}",
                marker,
                short_id(&item.id),
                item.published.format("%Y-%m-%d"),
                item.display_title()
            );
            shown += 1;
        }
    }

    if shown == 0 {
        println!("No items");
    }
    Ok(())
}

pub fn set_read(ctx: &AppContext, feed: &str, item: &str, read: bool) -> Result<()> {
    let feed = resolve_feed(ctx, feed)?;
    let item_id = resolve_item_id(&feed, item)?;

    ctx.store.set_item_read(&feed.id, &item_id, read)?;
    println!(
        "Marked {} as {}",
        short_id(&item_id),
        if read { "read" } else { "unread" }
    );
    Ok(())
}

/// Subscribe to each configured default feed that is not stored yet.
pub async fn init_defaults(ctx: &AppContext) -> Result<()> {
    for url in &ctx.config.default_feeds {
        if let Err(e) = add_feed(ctx, url).await {
            eprintln!("Failed to add {}: {}", url, e);
        }
    }
    Ok(())
}

pub async fn watch(ctx: &AppContext) -> Result<()> {
    if !ctx.config.auto_refresh {
        println!("auto_refresh is disabled in the config; nothing to do");
        return Ok(());
    }

    let minutes = ctx.config.refresh_interval.max(1);
    println!("Refreshing every {} minutes, Ctrl+C to stop", minutes);
    let mut interval = tokio::time::interval(Duration::from_secs(minutes * 60));

    loop {
        tokio::select! {
            _ = interval.tick() => update_feeds(ctx).await?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping watch");
                break;
            }
        }
    }

    Ok(())
}

/// Accepts a feed URL, a full id or a unique id prefix.
fn resolve_feed(ctx: &AppContext, target: &str) -> Result<Feed> {
    if Url::parse(target).is_ok() {
        return Ok(ctx.store.get_by_id(&Feed::id_for_url(target))?);
    }

    match ctx.store.get_by_id(target) {
        Err(e) if e.is_not_found() => {}
        other => return Ok(other?),
    }

    let mut matches = ctx
        .store
        .get_all()?
        .into_iter()
        .filter(|feed| !target.is_empty() && feed.id.starts_with(target));
    match (matches.next(), matches.next()) {
        (Some(feed), None) => Ok(feed),
        _ => Err(StoreError::FeedNotFound(target.to_string()).into()),
    }
}

fn resolve_item_id(feed: &Feed, target: &str) -> Result<String> {
    if feed.find_item(target).is_some() {
        return Ok(target.to_string());
    }

    let mut matches = feed
        .items
        .iter()
        .filter(|item| !target.is_empty() && item.id.starts_with(target));
    match (matches.next(), matches.next()) {
        (Some(item), None) => Ok(item.id.clone()),
        _ => Err(StoreError::ItemNotFound {
            feed_id: feed.id.clone(),
            item_id: target.to_string(),
        }
        .into()),
    }
}

/// Network failures are transient; a bad document will fail the same way
/// next time.
fn retry_hint(err: &BrookError) -> &'static str {
    match err {
        BrookError::Fetch(e) if e.is_retryable() => " (will retry on next update)",
        _ => "",
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::app::FetchError;
    use crate::config::Config;
    use crate::fetcher::testing::{rss, MockTransport};

    const URL: &str = "https://example.com/feed.xml";

    fn test_context(transport: Arc<MockTransport>) -> (AppContext, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            default_feeds: vec![URL.to_string()],
            ..Config::default()
        };
        let ctx = AppContext::with_transport(config, transport).unwrap();
        (ctx, temp_dir)
    }

    #[tokio::test]
    async fn test_add_then_read_by_prefix() {
        let transport = Arc::new(MockTransport::new());
        transport.serve(URL, &rss("News", &[("a", "First"), ("b", "Second")]));
        let (ctx, _temp_dir) = test_context(transport);

        add_feed(&ctx, URL).await.unwrap();
        let feed = ctx.store.get_by_id(&Feed::id_for_url(URL)).unwrap();
        let item_id = feed.items[1].id.clone();

        set_read(&ctx, short_id(&feed.id), &item_id[..12], true).unwrap();
        let stored = ctx.store.get_by_id(&feed.id).unwrap();
        assert!(stored.find_item(&item_id).unwrap().read);
        assert_eq!(stored.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_url() {
        let (ctx, _temp_dir) = test_context(Arc::new(MockTransport::new()));
        let err = add_feed(&ctx, "not a url").await.unwrap_err();
        assert!(matches!(err, BrookError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_add_existing_feed_keeps_read_state() {
        let transport = Arc::new(MockTransport::new());
        transport.serve(URL, &rss("News", &[("a", "First")]));
        let (ctx, _temp_dir) = test_context(transport);

        init_defaults(&ctx).await.unwrap();
        let feed = ctx.store.get_by_id(&Feed::id_for_url(URL)).unwrap();
        ctx.store.mark_item_read(&feed.id, &feed.items[0].id).unwrap();

        add_feed(&ctx, URL).await.unwrap();
        assert_eq!(ctx.store.get_by_id(&feed.id).unwrap().unread_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_by_url() {
        let transport = Arc::new(MockTransport::new());
        transport.serve(URL, &rss("News", &[("a", "First")]));
        let (ctx, _temp_dir) = test_context(transport);

        add_feed(&ctx, URL).await.unwrap();
        remove_feed(&ctx, URL).unwrap();
        assert!(ctx.store.get_all().unwrap().is_empty());

        let err = remove_feed(&ctx, URL).unwrap_err();
        assert!(matches!(err, BrookError::Store(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_update_reports_unreachable_feed_and_keeps_going() {
        let transport = Arc::new(MockTransport::new());
        transport.serve(URL, &rss("News", &[("a", "First")]));
        let (ctx, _temp_dir) = test_context(transport.clone());
        add_feed(&ctx, URL).await.unwrap();

        transport.remove(URL);
        update_feeds(&ctx).await.unwrap();
        assert_eq!(ctx.store.get_by_id(&Feed::id_for_url(URL)).unwrap().items.len(), 1);
    }

    #[test]
    fn test_retry_hint_only_for_network_failures() {
        let network = BrookError::Fetch(FetchError::network(URL, "connection reset"));
        let parse = BrookError::Fetch(FetchError::parse(URL, "not a feed"));
        let store = BrookError::Store(StoreError::FeedNotFound("x".into()));

        assert_eq!(retry_hint(&network), " (will retry on next update)");
        assert_eq!(retry_hint(&parse), "");
        assert_eq!(retry_hint(&store), "");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
