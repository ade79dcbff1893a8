use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Failure to retrieve or understand a feed document.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Feed parsing error for {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    pub fn network<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Network {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn parse(url: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            url: url.to_string(),
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid feed record: {0}")]
    Validation(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("Item {item_id} not found in feed {feed_id}")]
    ItemNotFound { feed_id: String, item_id: String },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt feed record {id}: {source}")]
    Corrupt {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode feed record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for both a missing feed and a missing item.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FeedNotFound(_) | Self::ItemNotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum BrookError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, BrookError>;
