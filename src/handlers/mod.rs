pub mod health;
pub mod metrics_handler;
pub mod predict;

use std::sync::Arc;

use crate::estimator::PriceEstimator;

/// Application state shared by request handlers
#[derive(Clone)]
pub struct AppState {
    pub estimator: Arc<PriceEstimator>,
}

impl AppState {
    pub fn new(estimator: PriceEstimator) -> Self {
        Self {
            estimator: Arc::new(estimator),
        }
    }
}
