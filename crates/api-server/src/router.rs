//! API router: mounts product, metric, dashboard and analytics endpoints
//! under /api/v1 next to the operational probes.

use crate::handlers;
use crate::rest::{self, AppState};
use axum::routing::{get, post, put};
use axum::Router;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Products
        .route(
            "/api/v1/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/v1/products/:id",
            get(handlers::get_product)
                .put(handlers::rename_product)
                .delete(handlers::delete_product),
        )
        // Metrics
        .route(
            "/api/v1/products/:id/metrics",
            get(handlers::list_metrics).put(handlers::upsert_metric),
        )
        .route(
            "/api/v1/products/:id/metrics/:date",
            put(handlers::upsert_metric_at).delete(handlers::delete_metric),
        )
        // Reports
        .route("/api/v1/dashboard", get(handlers::dashboard))
        .route("/api/v1/analytics", post(handlers::analytics))
        // Operational endpoints
        .route("/health", get(rest::health_check))
        .route("/ready", get(rest::readiness))
        .route("/live", get(rest::liveness))
        .with_state(state)
}
