use anyhow::Result;
use car_price_estimator::config::{self, Config};
use colored::Colorize;
use std::path::Path;

/// Execute the config show command
///
/// Prints the effective configuration after defaults, file and environment
/// are merged
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());

    let cfg = config::load_config(config_path)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", render_toml(&cfg)?);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  Listen: {}:{}", cfg.server.host, cfg.server.port);
    println!(
        "  Conversion Rate: {} ({} -> {})",
        cfg.pricing.conversion_rate, cfg.pricing.source_currency, cfg.pricing.target_currency
    );
    println!("  CORS Origins: {}", cfg.cors.allowed_origins.len());

    Ok(())
}

fn render_toml(cfg: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}
