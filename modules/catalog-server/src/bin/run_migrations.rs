use anyhow::Result;
use tracing_subscriber::EnvFilter;

use catalog_common::Config;
use catalog_store::MIGRATOR;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = Config::database_from_env()?;
    let pool = sqlx::PgPool::connect(&database_url).await?;

    MIGRATOR.run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
