//! LitGraph ingest CLI
//!
//! Runs one update cycle against the configured store and prints the report
//! as JSON:
//! 1. Loads the stored snapshot
//! 2. Polls every catalog provider in order
//! 3. Appends new articles and rebuilds the graph
//! 4. Saves the snapshot

use anyhow::Context;
use clap::Parser;
use litgraph_common::{config::AppConfig, telemetry, JsonFileStore, VERSION};
use litgraph_ingestion::{Aggregator, UpdatePipeline, UpdateRange};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Refresh the article graph from the catalog providers
#[derive(Debug, Parser)]
#[command(name = "ingest", version, about)]
struct Cli {
    /// First day of the update window (YYYY-MM-DD)
    #[arg(long, requires = "end_date")]
    start_date: Option<String>,

    /// Last day of the update window (YYYY-MM-DD)
    #[arg(long, requires = "start_date")]
    end_date: Option<String>,

    /// Snapshot path, overriding `store.path`
    #[arg(long)]
    store: Option<PathBuf>,

    /// Configuration file to use instead of the `config/` directory
    #[arg(long)]
    config: Option<String>,
}

/// Window used when no dates are given
const DEFAULT_WINDOW_DAYS: i64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;
    telemetry::init_tracing(&config.observability);

    info!("Starting LitGraph ingest v{}", VERSION);

    let range = match (&cli.start_date, &cli.end_date) {
        (None, None) => UpdateRange::last_days(DEFAULT_WINDOW_DAYS),
        (start, end) => UpdateRange::parse(start.as_deref(), end.as_deref())?,
    };

    let store_path = cli.store.unwrap_or_else(|| config.store.path.clone());
    let store = Arc::new(JsonFileStore::new(&store_path));
    let aggregator =
        Aggregator::from_config(&config.providers).context("Failed to build provider clients")?;

    info!(
        store = %store_path.display(),
        tasks = aggregator.tasks().len(),
        "Running update cycle"
    );

    let pipeline = UpdatePipeline::new(aggregator, store);
    let report = pipeline.run(range).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
