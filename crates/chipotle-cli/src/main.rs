use std::path::PathBuf;

use anyhow::{Context, Result};
use chipotle_sync::SyncConfig;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "chipotle-cli")]
#[command(about = "Harvest restaurant locations and menus into SQLite")]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search, fetch every menu and rebuild the database (default).
    Sync,
    /// Print the effective search query as YAML.
    Query,
}

#[derive(Debug, Args)]
struct Overrides {
    /// Database file; any existing file is replaced.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Concurrent menu fetches.
    #[arg(long, global = true)]
    workers: Option<usize>,

    #[arg(long, global = true)]
    api_key: Option<String>,

    /// YAML search query replacing the nationwide default.
    #[arg(long, global = true)]
    query: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, mut config: SyncConfig) -> SyncConfig {
        if let Some(db_path) = self.db_path {
            config.db_path = db_path;
        }
        if let Some(workers) = self.workers {
            config.fetch_workers = workers.max(1);
        }
        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }
        if let Some(query) = self.query {
            config.query_file = Some(query);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.overrides.apply(SyncConfig::from_env());

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let summary = chipotle_sync::run_sync_once(config).await?;
            println!(
                "sync complete: run_id={} restaurants={} menus={} failed_menus={} items={} db={}",
                summary.run_id,
                summary.persisted_restaurants,
                summary.menus,
                summary.failed_menus,
                summary.items,
                summary.database_path
            );
        }
        Commands::Query => {
            let query = config.search_query()?;
            let yaml = serde_yaml::to_string(&query).context("serializing search query")?;
            print!("{yaml}");
        }
    }

    Ok(())
}
