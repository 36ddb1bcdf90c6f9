//! Carbon Daemon - Carbon Footprint Tracker API
//!
//! Serves the activity catalog, calculates emissions and takes
//! subscriptions for weekly tips.

use anyhow::Result;
use carbon_common::ServerConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Carbon Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::load()?;
    carbond::server::run(config).await
}
