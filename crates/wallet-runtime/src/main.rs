//! Wallet-core process entry point.

use anyhow::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use wallet_runtime::{RuntimeConfig, WalletRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load configuration
    let config = RuntimeConfig::from_env();
    info!(relay = %config.relay_url, chain = %config.chain_id, "Configuration loaded");

    // Build and start the runtime
    let runtime = WalletRuntime::new(config, serde_json::Value::Null)?;
    runtime.start().await?;

    info!("Wallet runtime is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    // Graceful shutdown
    runtime.shutdown();

    Ok(())
}
