//! Product catalog service.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────┐        ┌────────────────────────────────┐
//!   Browser ─────▶│  gateway (optional, :8080)   │───────▶│   catalog service (:3000)      │
//!   /api/...      │  strip /api, forward, relay  │        │                                │
//!                 └──────────────────────────────┘        │  router ──▶ handlers ──▶ Arc<  │
//!                                                         │                         Catalog>│
//!                                                         └────────────────────────────────┘
//!
//!   Cross-cutting: config (TOML + env), request IDs, tracing, CORS, metrics, graceful shutdown
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use catalog_service::config::{load_config, ServiceConfig};
use catalog_service::lifecycle::{shutdown_on_signal, Shutdown};
use catalog_service::observability::{logging, metrics};
use catalog_service::{GatewayServer, HttpServer};

#[derive(Parser)]
#[command(name = "catalog-service", version)]
#[command(about = "Read-only product catalog over HTTP", long_about = None)]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone, Copy)]
enum Mode {
    /// Serve the product catalog (default)
    Serve,
    /// Run the API gateway in front of a catalog service
    Gateway,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "catalog-service starting");

    init_metrics(&config)?;

    let shutdown = Shutdown::new();
    let _signals = shutdown_on_signal(shutdown.clone());

    match args.mode.unwrap_or(Mode::Serve) {
        Mode::Serve => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            let server = HttpServer::new(config);
            server.run(listener, shutdown.subscribe()).await?;
        }
        Mode::Gateway => {
            let listener = TcpListener::bind(&config.gateway.bind_address).await?;
            let server = GatewayServer::new(config)?;
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_metrics(config: &ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }
    let addr = config.observability.metrics_address.parse()?;
    metrics::init_metrics(addr)?;
    Ok(())
}
