use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{
    error::AppError,
    handlers::AppState,
    metrics,
    request::{PredictionPayload, ValidationError},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Price in the target currency
    pub predicted_price: f64,
}

/// Handle POST /predict
pub async fn handle_predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictionPayload>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let start = Instant::now();
    let mode = state.estimator.mode().name();

    let result = predict(&state, payload);

    match &result {
        Ok(response) => {
            metrics::record_prediction(mode, "success");
            tracing::info!(
                mode = mode,
                predicted_price = response.predicted_price,
                duration_ms = start.elapsed().as_millis(),
                "Completed price prediction"
            );
        }
        Err(e @ AppError::Validation(_)) => {
            metrics::record_prediction(mode, e.kind());
            tracing::debug!(mode = mode, error = %e, "Rejected prediction request");
        }
        Err(e @ AppError::Prediction(cause)) => {
            metrics::record_prediction(mode, e.kind());
            tracing::error!(
                mode = mode,
                error_kind = cause.kind(),
                error = %e,
                "Price prediction failed"
            );
        }
    }
    metrics::record_duration(mode, start.elapsed());

    result.map(Json)
}

fn predict(
    state: &AppState,
    payload: Result<Json<PredictionPayload>, JsonRejection>,
) -> Result<PredictionResponse, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;

    let vehicle = payload.validate()?;

    tracing::debug!(
        year = vehicle.year,
        make = %vehicle.make,
        model = %vehicle.model,
        mileage = vehicle.mileage,
        condition = vehicle.condition,
        "Estimating price"
    );

    let predicted_price = state.estimator.estimate(&vehicle)?;

    Ok(PredictionResponse { predicted_price })
}
