//! Configuration management for brook.
//!
//! Configuration is read from `~/.config/brook/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::fetcher::parallel::DEFAULT_WORKERS;

pub const DEFAULT_FEEDS: [&str; 2] = [
    "https://blog.golang.org/feed.atom",
    "https://news.ycombinator.com/rss",
];

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one JSON record per feed.
    pub data_dir: PathBuf,
    /// Feeds subscribed by `brook init`.
    pub default_feeds: Vec<String>,
    /// Minutes between refreshes in `brook watch`.
    pub refresh_interval: u64,
    pub auto_refresh: bool,
    /// Maximum concurrent fetches during a refresh.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            refresh_interval: 30,
            auto_refresh: true,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Same as [`Config::load`] for an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/brook/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("brook").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        let defaults = Self::default();
        let feeds = defaults
            .default_feeds
            .iter()
            .map(|url| format!("    \"{}\",", url))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r##"# brook configuration
#
# Directory where each subscribed feed is stored as a JSON record.
# data_dir = "{data_dir}"

# Feeds subscribed by `brook init`.
default_feeds = [
{feeds}
]

# Minutes between refreshes when running `brook watch`.
refresh_interval = {interval}

# Set to false to make `brook watch` exit instead of looping.
auto_refresh = {auto_refresh}

# Maximum number of feeds fetched at the same time.
workers = {workers}
"##,
            data_dir = defaults.data_dir.display(),
            feeds = feeds,
            interval = defaults.refresh_interval,
            auto_refresh = defaults.auto_refresh,
            workers = defaults.workers,
        )
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brook")
        .join("feeds")
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
