use anyhow::Result;
use car_price_estimator::{config, init_tracing, request::PredictionPayload};
use colored::Colorize;
use serde_json::json;
use std::path::Path;

use crate::cli::PredictArgs;

/// Execute the predict command
///
/// Runs the same validation and estimator as `POST /predict`.
pub fn execute(config_path: &Path, args: PredictArgs) -> Result<()> {
    let cfg = config::load_config(config_path)?;
    init_tracing(&cfg.server);

    let estimator = super::build_estimator(&cfg);

    let payload = to_payload(&args);
    let vehicle = payload.validate()?;
    let price = estimator.estimate(&vehicle)?;

    println!(
        "{} {} {} ({}, {} miles, condition {})",
        "Estimate for".bold(),
        vehicle.make,
        vehicle.model,
        vehicle.year,
        vehicle.mileage,
        vehicle.condition
    );
    println!(
        "  {}: {:.2} {}",
        "Price".cyan(),
        price,
        cfg.pricing.target_currency
    );
    println!("  {}: {}", "Mode".cyan(), estimator.mode().name());

    Ok(())
}

fn to_payload(args: &PredictArgs) -> PredictionPayload {
    PredictionPayload {
        year: Some(json!(args.year)),
        make: Some(json!(args.make)),
        model: Some(json!(args.model)),
        mileage: Some(json!(args.mileage)),
        condition: args.condition.map(|c| json!(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_price_estimator::request::ValidationError;

    fn args(mileage: f64, condition: Option<i64>) -> PredictArgs {
        PredictArgs {
            year: 2015,
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            mileage,
            condition,
        }
    }

    #[test]
    fn test_to_payload_defaults_condition() {
        let vehicle = to_payload(&args(80000.0, None)).validate().unwrap();
        assert_eq!(vehicle.condition, 5);
        assert_eq!(vehicle.mileage, 80000.0);
    }

    #[test]
    fn test_to_payload_applies_request_validation() {
        let result = to_payload(&args(0.0, Some(7))).validate();
        assert_eq!(result, Err(ValidationError::MissingFields));
    }
}
