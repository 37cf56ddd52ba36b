use anyhow::Result;
use car_price_estimator::{config, init_tracing, server};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// This will:
/// 1. Load configuration
/// 2. Initialize logging
/// 3. Load the model artifact, falling back to heuristic mode
/// 4. Start the server
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting car price estimator...".green());

    let cfg = config::load_config(config_path)?;
    init_tracing(&cfg.server);

    info!(config = %config_path.display(), "Configuration loaded");

    let estimator = super::build_estimator(&cfg);

    // Blocks until shutdown
    server::start_server(cfg, estimator).await?;

    Ok(())
}
