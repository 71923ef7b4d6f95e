//! Bulk-load product documents produced by the offline pipeline.
//!
//! Existing documents with the same `_id` are replaced.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catalog_common::Config;
use catalog_server::import::parse_documents;
use catalog_store::{PgProductStore, ProductStore, MIGRATOR};

#[derive(Parser)]
#[command(name = "import-products", about = "Upsert product documents from a JSON or JSON-lines file")]
struct Cli {
    /// JSON array or JSON-lines file of product documents
    file: PathBuf,

    /// Documents per transaction
    #[arg(long, default_value_t = 500)]
    batch_size: usize,

    /// Parse and validate only; write nothing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let content = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("Failed to read {}", cli.file.display()))?;
    let parsed = parse_documents(&content)
        .with_context(|| format!("Failed to parse {}", cli.file.display()))?;

    for rejected in &parsed.rejected {
        warn!(position = rejected.position, reason = %rejected.reason, "Skipping document");
    }
    info!(
        valid = parsed.products.len(),
        rejected = parsed.rejected.len(),
        "Documents parsed"
    );

    if cli.dry_run {
        return Ok(());
    }

    let database_url = Config::database_from_env()?;
    let pool = sqlx::PgPool::connect(&database_url).await?;
    MIGRATOR.run(&pool).await?;
    let store = PgProductStore::new(pool);

    let progress = ProgressBar::new(parsed.products.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} products ({eta})")
            .context("Invalid progress template")?,
    );

    let mut written = 0;
    for batch in parsed.products.chunks(cli.batch_size.max(1)) {
        written += store.upsert_many(batch).await?;
        progress.inc(batch.len() as u64);
    }
    progress.finish();

    info!(written, "Import complete");
    Ok(())
}
