use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::generate_id_from_parts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub link: String,
    pub published: DateTime<Utc>,
    pub read: bool,
}

impl Item {
    /// Create an unread item whose id is derived from the upstream guid and link.
    pub fn new(guid: &str, link: &str, published: DateTime<Utc>) -> Self {
        Self {
            id: Self::id_for(guid, link),
            title: String::new(),
            description: String::new(),
            content: String::new(),
            link: link.to_string(),
            published,
            read: false,
        }
    }

    /// Deterministic ID from the guid followed by the link. An empty guid
    /// still hashes the pair, since the link alone is usually unique.
    pub fn id_for(guid: &str, link: &str) -> String {
        generate_id_from_parts(&[guid, link])
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}
