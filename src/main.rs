use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use brook::app::AppContext;
use brook::cli::{commands, Cli, Commands};
use brook::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Add { url } => {
            commands::add_feed(&ctx, &url).await?;
        }
        Commands::Remove { feed } => {
            commands::remove_feed(&ctx, &feed)?;
        }
        Commands::Update => {
            commands::update_feeds(&ctx).await?;
        }
        Commands::List { items, unread } => {
            if items {
                commands::list_items(&ctx, unread)?;
            } else {
                commands::list_feeds(&ctx)?;
            }
        }
        Commands::Read { feed, item, unread } => {
            commands::set_read(&ctx, &feed, &item, !unread)?;
        }
        Commands::Init => {
            commands::init_defaults(&ctx).await?;
        }
        Commands::Watch => {
            commands::watch(&ctx).await?;
        }
    }

    Ok(())
}
