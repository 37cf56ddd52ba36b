use anyhow::Result;
use car_price_estimator::{
    config, init_tracing,
    model::{Mode, FEATURE_NAMES},
};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Execute the test command
///
/// Validates the configuration and tries to load the model artifact without
/// starting the server. A missing artifact is reported, not treated as a
/// failure.
pub fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Testing configuration...".yellow());

    let cfg = config::load_config(config_path)?;
    init_tracing(&cfg.server);
    info!("Configuration loaded and validated");

    println!("{}", "✓ Configuration test successful".green());
    println!();

    println!("{}", "Configuration Summary:".bold());
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!("  {}: {}", "Log Level".cyan(), cfg.server.log_level);
    println!("  {}: {}", "Log Format".cyan(), cfg.server.log_format);
    println!(
        "  {}: 1 {} = {} {}",
        "Conversion".cyan(),
        cfg.pricing.source_currency,
        cfg.pricing.conversion_rate,
        cfg.pricing.target_currency
    );
    println!();

    println!("{}", "Artifacts:".cyan());
    println!("    Model: {}", cfg.artifacts.model_path.display());
    println!("    Encoders: {}", cfg.artifacts.encoders_path.display());

    let estimator = super::build_estimator(&cfg);
    match estimator.mode() {
        Mode::ModelBacked(artifact) => {
            println!(
                "    {} ({} regressor, {} makes, {} models)",
                "loaded".green(),
                artifact.regressor().kind(),
                artifact.make_encoder().len(),
                artifact.model_encoder().len()
            );
            println!("    Features: {}", FEATURE_NAMES.join(", "));
            println!("  {}: {}", "Mode".cyan(), estimator.mode().name().green());
        }
        Mode::Heuristic => {
            println!("    {} (reason logged above)", "unavailable".red());
            println!("  {}: {}", "Mode".cyan(), estimator.mode().name().yellow());
            println!(
                "    Floor: {} {}",
                estimator.price_floor(),
                cfg.pricing.target_currency
            );
        }
    }
    println!();

    println!("  {}: {}", "CORS Origins".cyan(), cfg.cors.allowed_origins.len());
    for origin in &cfg.cors.allowed_origins {
        println!("    {}", origin);
    }
    println!();

    println!("  {}: {}", "Metrics".cyan(), if cfg.metrics.enabled {
        "enabled".green()
    } else {
        "disabled".red()
    });
    if cfg.metrics.enabled {
        println!("    Endpoint: {}", cfg.metrics.endpoint);
    }

    info!("Configuration test completed");
    Ok(())
}
