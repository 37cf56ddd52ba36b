use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::{get, post}, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    cors::cors_layer,
    estimator::PriceEstimator,
    handlers::{self, AppState},
    metrics,
    signals::setup_signal_handlers,
};

/// Request bodies are a handful of fields
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Start the estimator HTTP server
///
/// This function:
/// 1. Initializes metrics (when enabled)
/// 2. Sets up signal handlers for graceful shutdown
/// 3. Creates the Axum application
/// 4. Binds to the configured address
/// 5. Serves requests until a shutdown signal arrives
pub async fn start_server(config: Config, estimator: PriceEstimator) -> Result<()> {
    let mode = estimator.mode().name();

    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics(mode)?))
    } else {
        None
    };

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(&config, AppState::new(estimator), metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!(
        mode = mode,
        conversion_rate = config.pricing.conversion_rate,
        "Starting car price estimator on {} ({} -> {})",
        addr,
        config.pricing.source_currency,
        config.pricing.target_currency,
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    config: &Config,
    app_state: AppState,
    metrics_handle: Option<Arc<PrometheusHandle>>,
) -> Router {
    let mut app = Router::new()
        .route("/predict", post(handlers::predict::handle_predict))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(app_state);

    if let Some(handle) = metrics_handle {
        let metrics_routes = Router::new()
            .route(
                &config.metrics.endpoint,
                get(handlers::metrics_handler::metrics),
            )
            .with_state(handle);
        app = app.merge(metrics_routes);
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http())
}
