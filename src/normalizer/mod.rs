use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;

use crate::app::FetchError;
use crate::domain::{Feed, Item};

/// Converts a raw RSS/Atom/JSON Feed document into the canonical [`Feed`] model.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// `fetched_at` stamps the feed and stands in for items with no date at all.
    pub fn normalize(
        &self,
        url: &str,
        body: &[u8],
        fetched_at: DateTime<Utc>,
    ) -> Result<Feed, FetchError> {
        let parsed = build_parser()
            .parse(body)
            .map_err(|e| FetchError::parse(url, e.to_string()))?;

        let mut feed = Feed::new(url);
        feed.last_updated = fetched_at;
        feed.title = parsed
            .title
            .map(|t| decode_html_entities(&t.content).to_string())
            .unwrap_or_default();
        feed.description = parsed
            .description
            .map(|d| decode_html_entities(&d.content).to_string())
            .unwrap_or_default();
        feed.image_url = parsed
            .logo
            .or(parsed.icon)
            .map(|image| image.uri)
            .unwrap_or_default();

        feed.items = parsed
            .entries
            .into_iter()
            .map(|entry| normalize_entry(entry, fetched_at))
            .collect();

        tracing::debug!("Normalized {} items from {}", feed.items.len(), url);
        Ok(feed)
    }
}

/// A feed-rs parser that leaves missing entry ids empty. Its default fills
/// them from a hash of link and title, or a random UUID when there is no link.
fn build_parser() -> parser::Parser {
    parser::Builder::new()
        .id_generator(|_links, _title, _uri| String::new())
        .build()
}

fn normalize_entry(entry: Entry, fetched_at: DateTime<Utc>) -> Item {
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .unwrap_or_default();
    let published = entry.published.or(entry.updated).unwrap_or(fetched_at);

    // The id hashes the raw guid and link, before any decoding.
    let mut item = Item::new(&entry.id, &link, published);

    item.title = entry
        .title
        .map(|t| decode_html_entities(&t.content).to_string())
        .unwrap_or_default();
    item.description = entry.summary.map(|s| s.content).unwrap_or_default();
    item.content = entry
        .content
        .and_then(|c| c.body)
        .filter(|body| !body.is_empty())
        .unwrap_or_else(|| item.description.clone());

    item
}
