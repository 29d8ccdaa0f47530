//! # Cellar Market Runtime
//!
//! Entry point of the marketplace server.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG`, default `info`)
//! 2. Load configuration (defaults + `CELLAR_*` environment)
//! 3. Refuse to start with the zero file key
//! 4. Open the identity store (directory lock, stamp checks, load)
//! 5. Accept connections until Ctrl+C

use anyhow::{Context, Result};
use market_runtime::{MarketRuntime, RuntimeConfig};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("===========================================");
    info!("  Cellar Market Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let config = RuntimeConfig::from_env();
    config
        .validate_for_production()
        .context("Refusing to start")?;

    let runtime = MarketRuntime::bind(&config).await?;
    info!("Data Dir: {:?}", config.storage.data_dir);

    runtime
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await?;

    info!("Runtime stopped");
    Ok(())
}
