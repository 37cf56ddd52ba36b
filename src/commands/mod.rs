//! Command implementations for the CLI
//!
//! - start: Start the HTTP server
//! - test: Check configuration and artifact loading
//! - predict: One-shot price estimate
//! - config: Configuration display and validation

pub mod config;
pub mod predict;
pub mod start;
pub mod test;

use car_price_estimator::{
    config::Config,
    estimator::PriceEstimator,
    model::{self, Mode},
};

/// Load the artifact and build the estimator the server would use
pub fn build_estimator(cfg: &Config) -> PriceEstimator {
    let mode = Mode::from_load_result(model::load_artifact(&cfg.artifacts));
    PriceEstimator::new(mode, cfg.pricing.conversion_rate)
}
