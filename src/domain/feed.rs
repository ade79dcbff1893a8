use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::id::generate_id;
use crate::domain::Item;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    pub last_updated: DateTime<Utc>,
    pub items: Vec<Item>,
}

impl Feed {
    pub fn new(url: &str) -> Self {
        Self {
            id: Self::id_for_url(url),
            title: String::new(),
            description: String::new(),
            url: url.to_string(),
            image_url: String::new(),
            last_updated: Utc::now(),
            items: Vec::new(),
        }
    }

    /// The feed id is a pure function of its subscription URL.
    pub fn id_for_url(url: &str) -> String {
        generate_id(url)
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    pub fn find_item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == item_id)
    }
}
