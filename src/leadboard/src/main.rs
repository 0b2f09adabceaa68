//! Leadboard: marketing performance tracking per product.
//!
//! Main entry point that loads configuration, prepares the record store and
//! starts the API server.

use clap::Parser;
use leadboard_api::ApiServer;
use leadboard_core::config::AppConfig;
use leadboard_store::{MetricsStore, DEMO_ACCOUNT};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "leadboard")]
#[command(about = "Marketing performance metrics and comparative reports per product")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, short, env = "LEADBOARD_CONFIG")]
    config: Option<String>,

    /// Node identifier (overrides config)
    #[arg(long, env = "LEADBOARD__NODE_ID")]
    node_id: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "LEADBOARD__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Metrics exporter port (overrides config)
    #[arg(long, env = "LEADBOARD__METRICS__PORT")]
    metrics_port: Option<u16>,

    /// Seed the store with demo products
    #[arg(long, default_value_t = false)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadboard=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Leadboard starting up");

    let mut config = AppConfig::load_from(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }
    if cli.demo {
        config.store.seed_demo_data = true;
    }

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        seed_demo_data = config.store.seed_demo_data,
        "Configuration loaded"
    );

    let store = if config.store.seed_demo_data {
        info!(account = %DEMO_ACCOUNT, "Seeding demo data");
        Arc::new(MetricsStore::with_demo_data())
    } else {
        Arc::new(MetricsStore::new())
    };

    let api_server = ApiServer::new(config, store);

    if let Err(e) = api_server.start_metrics() {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("Leadboard is ready to serve traffic");

    api_server.start_http().await?;

    Ok(())
}
