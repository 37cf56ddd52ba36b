//! Price estimation
//!
//! Prices come either from the trained regressor or, when no artifact was
//! loaded, from a deterministic depreciation heuristic. Both paths return a
//! price in the target currency.

use chrono::Datelike;
use thiserror::Error;

use crate::{
    model::{Artifact, Features, Mode, UnknownCategoryError},
    request::VehicleAttributes,
};

/// Starting price of the heuristic, in source currency
pub const HEURISTIC_BASE_PRICE: f64 = 50_000.0;

/// Depreciation per year of age
pub const HEURISTIC_PER_YEAR: f64 = 1_000.0;

/// Depreciation per unit of mileage
pub const HEURISTIC_PER_MILE: f64 = 0.01;

/// Depreciation per condition point below 10
pub const HEURISTIC_PER_CONDITION_POINT: f64 = 1_000.0;

/// Lowest heuristic price, in source currency, before conversion
pub const HEURISTIC_FLOOR: f64 = 5_000.0;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategoryError),

    #[error("estimated price is not a finite number ({0})")]
    NonFiniteOutput(f64),
}

impl PredictionError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictionError::UnknownCategory(_) => "unknown_category",
            PredictionError::NonFiniteOutput(_) => "non_finite_output",
        }
    }
}

/// Source of the current calendar year
///
/// Read on every heuristic estimate; results for fixed inputs change when
/// the year rolls over.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Local wall-clock year
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// Always reports the same year
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i32);

impl Clock for FixedClock {
    fn current_year(&self) -> i32 {
        self.0
    }
}

/// Estimates resale prices in the target currency
pub struct PriceEstimator {
    mode: Mode,
    conversion_rate: f64,
    clock: Box<dyn Clock>,
}

impl PriceEstimator {
    pub fn new(mode: Mode, conversion_rate: f64) -> Self {
        Self::with_clock(mode, conversion_rate, SystemClock)
    }

    pub fn with_clock(mode: Mode, conversion_rate: f64, clock: impl Clock + 'static) -> Self {
        Self {
            mode,
            conversion_rate,
            clock: Box::new(clock),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn conversion_rate(&self) -> f64 {
        self.conversion_rate
    }

    /// Lowest price the heuristic path can return, in target currency
    pub fn price_floor(&self) -> f64 {
        HEURISTIC_FLOOR * self.conversion_rate
    }

    pub fn estimate(&self, vehicle: &VehicleAttributes) -> Result<f64, PredictionError> {
        match &self.mode {
            Mode::ModelBacked(artifact) => self.model_estimate(artifact, vehicle),
            Mode::Heuristic => self.heuristic_estimate(vehicle),
        }
    }

    fn model_estimate(
        &self,
        artifact: &Artifact,
        vehicle: &VehicleAttributes,
    ) -> Result<f64, PredictionError> {
        let features = encode_features(artifact, vehicle)?;
        let converted = artifact.regressor().predict(&features) * self.conversion_rate;

        if !converted.is_finite() {
            return Err(PredictionError::NonFiniteOutput(converted));
        }

        Ok(converted)
    }

    fn heuristic_estimate(&self, vehicle: &VehicleAttributes) -> Result<f64, PredictionError> {
        let age = i64::from(self.clock.current_year()) - i64::from(vehicle.year);

        let age_factor = age as f64 * HEURISTIC_PER_YEAR;
        let mileage_factor = vehicle.mileage * HEURISTIC_PER_MILE;
        let condition_factor = (10.0 - vehicle.condition as f64) * HEURISTIC_PER_CONDITION_POINT;

        let estimate = HEURISTIC_BASE_PRICE - age_factor - mileage_factor - condition_factor;

        // Clamp before the finiteness check so an overflow to -inf lands on the floor
        let converted = (estimate * self.conversion_rate).max(self.price_floor());
        if !converted.is_finite() {
            return Err(PredictionError::NonFiniteOutput(converted));
        }

        Ok(converted)
    }
}

/// Build the fixed-order feature vector, encoding make and model
pub fn encode_features(
    artifact: &Artifact,
    vehicle: &VehicleAttributes,
) -> Result<Features, UnknownCategoryError> {
    let make = artifact.make_encoder().transform("make", &vehicle.make)?;
    let model = artifact.model_encoder().transform("model", &vehicle.model)?;

    Ok([
        f64::from(vehicle.year),
        make as f64,
        model as f64,
        vehicle.mileage,
        vehicle.condition as f64,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabelEncoder, Regressor};

    const RATE: f64 = 3.12;

    fn corolla(year: i32, mileage: f64, condition: i64) -> VehicleAttributes {
        VehicleAttributes {
            year,
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            mileage,
            condition,
        }
    }

    fn heuristic(rate: f64) -> PriceEstimator {
        PriceEstimator::with_clock(Mode::Heuristic, rate, FixedClock(2024))
    }

    fn linear_artifact() -> Artifact {
        let regressor = Regressor::Linear {
            intercept: -15_000.0,
            coefficients: vec![10.0, 1_000.0, 0.0, -0.05, 200.0],
        };
        let makes = LabelEncoder::new(vec!["Honda".to_string(), "Toyota".to_string()]).unwrap();
        let models = LabelEncoder::new(vec!["Civic".to_string(), "Corolla".to_string()]).unwrap();
        Artifact::new(regressor, makes, models).unwrap()
    }

    #[test]
    fn test_heuristic_reference_value() {
        let price = heuristic(RATE).estimate(&corolla(2015, 80_000.0, 5)).unwrap();
        // (50000 - 9000 - 800 - 5000) * 3.12
        assert_eq!(price, 109_824.0);
    }

    #[test]
    fn test_heuristic_floor() {
        let estimator = heuristic(RATE);
        let price = estimator.estimate(&corolla(1900, 10_000_000.0, 1)).unwrap();
        assert_eq!(price, 15_600.0);
        assert_eq!(price, estimator.price_floor());
    }

    #[test]
    fn test_heuristic_never_below_floor() {
        let estimator = heuristic(RATE);
        for year in [1950, 1990, 2005, 2020, 2024, 2030] {
            for mileage in [1.0, 50_000.0, 400_000.0, 5_000_000.0] {
                for condition in [-5, 1, 5, 10, 15] {
                    let price = estimator.estimate(&corolla(year, mileage, condition)).unwrap();
                    assert!(price >= estimator.price_floor(), "{} {} {}", year, mileage, condition);
                }
            }
        }
    }

    #[test]
    fn test_heuristic_overflow_clamps_to_floor() {
        let estimator = heuristic(150.0);
        let price = estimator.estimate(&corolla(2015, 1.7e308, 5)).unwrap();
        assert_eq!(price, 750_000.0);
        assert_eq!(price, estimator.price_floor());
    }

    #[test]
    fn test_heuristic_uses_clock_year() {
        let vehicle = corolla(2015, 80_000.0, 5);
        let this_year = PriceEstimator::with_clock(Mode::Heuristic, 1.0, FixedClock(2024));
        let next_year = PriceEstimator::with_clock(Mode::Heuristic, 1.0, FixedClock(2025));

        let diff = this_year.estimate(&vehicle).unwrap() - next_year.estimate(&vehicle).unwrap();
        assert_eq!(diff, HEURISTIC_PER_YEAR);
    }

    #[test]
    fn test_conversion_is_linear() {
        let vehicle = corolla(2018, 42_000.0, 7);
        let single = heuristic(RATE).estimate(&vehicle).unwrap();
        let double = heuristic(RATE * 2.0).estimate(&vehicle).unwrap();
        assert_eq!(double, single * 2.0);

        let model_single = PriceEstimator::new(Mode::ModelBacked(linear_artifact()), RATE)
            .estimate(&vehicle)
            .unwrap();
        let model_double = PriceEstimator::new(Mode::ModelBacked(linear_artifact()), RATE * 2.0)
            .estimate(&vehicle)
            .unwrap();
        assert_eq!(model_double, model_single * 2.0);
    }

    #[test]
    fn test_model_path_encodes_and_converts() {
        let estimator = PriceEstimator::new(Mode::ModelBacked(linear_artifact()), 2.0);
        let price = estimator.estimate(&corolla(2015, 80_000.0, 5)).unwrap();
        // -15000 + 20150 + 1000 * 1 + 0 - 4000 + 1000
        assert_eq!(price, 3_150.0 * 2.0);
    }

    #[test]
    fn test_model_path_has_no_floor() {
        let estimator = PriceEstimator::new(Mode::ModelBacked(linear_artifact()), 1.0);
        let price = estimator.estimate(&corolla(1950, 900_000.0, 1)).unwrap();
        assert!(price < estimator.price_floor());
    }

    #[test]
    fn test_model_path_rejects_non_finite_output() {
        let regressor = Regressor::Linear {
            intercept: 0.0,
            coefficients: vec![0.0, 0.0, 0.0, 10.0, 0.0],
        };
        let makes = LabelEncoder::new(vec!["Toyota".to_string()]).unwrap();
        let models = LabelEncoder::new(vec!["Corolla".to_string()]).unwrap();
        let artifact = Artifact::new(regressor, makes, models).unwrap();
        let estimator = PriceEstimator::new(Mode::ModelBacked(artifact), RATE);

        let err = estimator.estimate(&corolla(2015, 1.7e308, 5)).unwrap_err();
        assert!(matches!(err, PredictionError::NonFiniteOutput(v) if v == f64::INFINITY));
        assert_eq!(err.kind(), "non_finite_output");
    }

    #[test]
    fn test_model_path_rejects_unknown_make() {
        let estimator = PriceEstimator::new(Mode::ModelBacked(linear_artifact()), RATE);
        let mut vehicle = corolla(2015, 80_000.0, 5);
        vehicle.make = "Trabant".to_string();

        let err = estimator.estimate(&vehicle).unwrap_err();
        match err {
            PredictionError::UnknownCategory(e) => {
                assert_eq!(e.field, "make");
                assert_eq!(e.value, "Trabant");
            }
            other => panic!("expected unknown category, got {:?}", other),
        }
    }

    #[test]
    fn test_model_path_rejects_unknown_model() {
        let estimator = PriceEstimator::new(Mode::ModelBacked(linear_artifact()), RATE);
        let mut vehicle = corolla(2015, 80_000.0, 5);
        vehicle.model = "Prius".to_string();

        let err = estimator.estimate(&vehicle).unwrap_err();
        assert_eq!(err.kind(), "unknown_category");
        assert!(err.to_string().contains("model 'Prius'"));
    }

    #[test]
    fn test_feature_order() {
        let features = encode_features(&linear_artifact(), &corolla(2015, 80_000.0, 5)).unwrap();
        assert_eq!(features, [2015.0, 1.0, 1.0, 80_000.0, 5.0]);
    }
}
