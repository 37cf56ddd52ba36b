//! Prediction request parsing and validation
//!
//! Required fields follow "present and truthy" semantics: `null`, `0`, `""`,
//! `false` and empty containers all count as missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Condition used when the request omits it
pub const DEFAULT_CONDITION: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid field '{field}': expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}

/// Raw request body as sent by the frontend
///
/// Fields are kept as untyped JSON so missing and mistyped values can be
/// told apart and reported as validation errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionPayload {
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub make: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub mileage: Option<Value>,
    #[serde(default)]
    pub condition: Option<Value>,
}

/// Validated estimator input
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleAttributes {
    pub year: i32,
    pub make: String,
    pub model: String,
    pub mileage: f64,
    pub condition: i64,
}

impl PredictionPayload {
    pub fn validate(&self) -> Result<VehicleAttributes, ValidationError> {
        let required = [&self.year, &self.make, &self.model, &self.mileage];
        if !required
            .iter()
            .all(|field| matches!(field, Some(value) if is_truthy(value)))
        {
            return Err(ValidationError::MissingFields);
        }

        let year = self
            .year
            .as_ref()
            .and_then(as_integer)
            .and_then(|y| i32::try_from(y).ok())
            .ok_or(ValidationError::InvalidField {
                field: "year",
                expected: "an integer",
            })?;

        let make = as_string(&self.make).ok_or(ValidationError::InvalidField {
            field: "make",
            expected: "a string",
        })?;

        let model = as_string(&self.model).ok_or(ValidationError::InvalidField {
            field: "model",
            expected: "a string",
        })?;

        let mileage = self
            .mileage
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or(ValidationError::InvalidField {
                field: "mileage",
                expected: "a number",
            })?;

        let condition = match &self.condition {
            None | Some(Value::Null) => DEFAULT_CONDITION,
            Some(value) => as_integer(value).ok_or(ValidationError::InvalidField {
                field: "condition",
                expected: "an integer",
            })?,
        };

        Ok(VehicleAttributes {
            year,
            make,
            model,
            mileage,
            condition,
        })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Integers, or floats with no fractional part
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }

    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

fn as_string(value: &Option<Value>) -> Option<String> {
    value.as_ref().and_then(Value::as_str).map(str::to_string)
}
