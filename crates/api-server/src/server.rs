//! API server: binds the REST router and the Prometheus exporter.

use crate::rest::AppState;
use crate::router::api_router;
use leadboard_core::config::AppConfig;
use leadboard_reporting::format::CurrencyFormat;
use leadboard_store::MetricsStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub struct ApiServer {
    config: AppConfig,
    store: Arc<MetricsStore>,
}

impl ApiServer {
    pub fn new(config: AppConfig, store: Arc<MetricsStore>) -> Self {
        Self { config, store }
    }

    /// Start the HTTP REST server. Blocks until the listener fails.
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let state = AppState::new(
            self.store.clone(),
            self.config.node_id.clone(),
            CurrencyFormat::from(&self.config.reporting),
        );

        let app = api_router(state)
            .layer(CompressionLayer::new())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http());

        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);

        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    /// Start the metrics exporter on a separate port.
    pub fn start_metrics(&self) -> anyhow::Result<()> {
        if !self.config.metrics.enabled {
            info!("Metrics exporter disabled");
            return Ok(());
        }

        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;

        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}
