//! Midnight Alerts - Main Entry Point

use alerting::RuleSettings;
use api::{init_logging, run_server, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    init_logging(&config)?;

    info!("=== Midnight Alerts v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = RuleSettings::from_env()?;
    run_server(config, settings).await?;

    Ok(())
}
