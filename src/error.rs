use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

use crate::{estimator::PredictionError, request::ValidationError};

/// Errors surfaced to HTTP callers
#[derive(Debug)]
pub enum AppError {
    /// Request failed validation
    Validation(ValidationError),
    /// Estimation failed, including unknown make/model
    Prediction(PredictionError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::Prediction(_) => "prediction_error",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{}", err),
            Self::Prediction(err) => write!(f, "Prediction error: {}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        Self::Prediction(err)
    }
}
