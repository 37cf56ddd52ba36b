use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder
///
/// Fails if a recorder is already installed.
pub fn init_metrics(mode: &str) -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions(mode);

    Ok(handle)
}

/// Describe metrics and publish the info gauge (safe to call repeatedly)
fn init_metric_descriptions(mode: &str) {
    describe_counter!(
        "car_price_predictions_total",
        "Total number of price prediction requests"
    );
    describe_histogram!(
        "car_price_prediction_duration_seconds",
        "Prediction duration in seconds"
    );
    describe_gauge!(
        "car_price_estimator_info",
        "Estimator version and active mode"
    );

    gauge!(
        "car_price_estimator_info",
        "version" => env!("CARGO_PKG_VERSION"),
        "mode" => mode.to_string(),
    )
    .set(1.0);
}

/// Record a prediction outcome
pub fn record_prediction(mode: &str, outcome: &str) {
    counter!(
        "car_price_predictions_total",
        "mode" => mode.to_string(),
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}

/// Record prediction duration
pub fn record_duration(mode: &str, duration: Duration) {
    histogram!(
        "car_price_prediction_duration_seconds",
        "mode" => mode.to_string(),
    )
    .record(duration.as_secs_f64());
}
