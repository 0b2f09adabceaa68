//! Shared handler state and operational endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use leadboard_reporting::format::CurrencyFormat;
use leadboard_store::MetricsStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MetricsStore>,
    pub node_id: String,
    pub start_time: Instant,
    pub currency: CurrencyFormat,
}

impl AppState {
    pub fn new(store: Arc<MetricsStore>, node_id: String, currency: CurrencyFormat) -> Self {
        Self {
            store,
            node_id,
            start_time: Instant::now(),
            currency,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
    pub products: usize,
    pub metrics: usize,
}

/// GET /health: Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        products: state.store.product_count(),
        metrics: state.store.metric_count(),
    })
}

/// GET /ready: Readiness probe.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live: Liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
