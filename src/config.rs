use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::cors::OriginPattern;

/// Prefix for environment overrides, e.g. `CAR_PRICE__PRICING__CONVERSION_RATE`
pub const ENV_PREFIX: &str = "CAR_PRICE";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub pricing: PricingConfig,
    pub artifacts: ArtifactsConfig,
    pub cors: CorsConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Multiplier from source to target currency
    pub conversion_rate: f64,
    pub source_currency: String,
    pub target_currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            conversion_rate: 3.12,
            source_currency: "USD".to_string(),
            target_currency: "TND".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub model_path: PathBuf,
    pub encoders_path: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model/car_price_model.json"),
            encoders_path: PathBuf::from("model/encoders.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origins or patterns with a single `*` label wildcard
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "https://*.vercel.app".to_string(),
                "https://mycar-frontend.vercel.app".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

/// Load configuration from defaults, the optional TOML file and the process
/// environment
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    load_config_with_env(path, std::env::vars().collect())
}

/// Same as [`load_config`] with an explicit environment
///
/// `PORT` overrides `server.port`, matching common PaaS conventions.
pub fn load_config_with_env(path: &Path, env: HashMap<String, String>) -> anyhow::Result<Config> {
    let port = env.get("PORT").cloned();

    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .source(Some(env)),
        )
        .set_override_option("server.port", port)?
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    let rate = cfg.pricing.conversion_rate;
    if !rate.is_finite() || rate <= 0.0 {
        anyhow::bail!("Conversion rate must be a positive number, got {}", rate);
    }

    if cfg.server.host.parse::<std::net::IpAddr>().is_err() {
        anyhow::bail!("Server host '{}' is not a valid IP address", cfg.server.host);
    }

    if cfg.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    match cfg.server.log_format.as_str() {
        "text" | "json" => {}
        other => anyhow::bail!("Invalid log format '{}': expected 'text' or 'json'", other),
    }

    if cfg.artifacts.model_path.as_os_str().is_empty()
        || cfg.artifacts.encoders_path.as_os_str().is_empty()
    {
        anyhow::bail!("Artifact paths cannot be empty");
    }

    if cfg.metrics.enabled && !cfg.metrics.endpoint.starts_with('/') {
        anyhow::bail!(
            "Metrics endpoint '{}' must start with '/'",
            cfg.metrics.endpoint
        );
    }

    for origin in &cfg.cors.allowed_origins {
        OriginPattern::parse(origin)
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))?;
    }

    Ok(())
}
