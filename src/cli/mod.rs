pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "brook")]
#[command(about = "Keep a local mirror of your RSS/Atom feeds", long_about = None)]
pub struct Cli {
    /// Number of parallel workers for fetching feeds
    #[arg(short, long, global = true)]
    pub workers: Option<usize>,

    /// Directory holding the feed records (overrides the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Subscribe to a feed
    Add {
        /// URL of the feed to add
        url: String,
    },
    /// Unsubscribe from a feed
    Remove {
        /// Feed URL, id or id prefix
        feed: String,
    },
    /// Re-fetch all feeds, keeping read state
    Update,
    /// List feeds or items
    List {
        /// Show items instead of feeds
        #[arg(long)]
        items: bool,

        /// Only show unread items
        #[arg(long)]
        unread: bool,
    },
    /// Mark an item as read
    Read {
        /// Feed URL, id or id prefix
        feed: String,
        /// Item id or id prefix
        item: String,

        /// Mark as unread instead
        #[arg(long)]
        unread: bool,
    },
    /// Subscribe to the default feeds from the config file
    Init,
    /// Refresh all feeds periodically until interrupted
    Watch,
}
