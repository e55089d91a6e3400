//! API gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Client request  GET /api/products/1?x=y
//!     → common layers (request ID, trace, CORS, timeout)
//!     → proxy.rs (strip prefix, rewrite Host, drop hop-by-hop headers)
//!     → upstream catalog service  GET /products/1?x=y
//!     → response relayed unchanged (status, headers, body)
//! ```
//!
//! # Design Decisions
//! - Single upstream; no load balancing or retries
//! - Any upstream failure is answered with 500 `{"error": "Gateway error"}`
//! - The gateway answers its own `/health` without consulting the upstream

pub mod proxy;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    routing::{any, get},
    Json, Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;

use crate::config::ServiceConfig;
use crate::http::handlers::HealthStatus;
use crate::http::middleware::track_metrics;
use crate::http::server::{serve, with_common_layers};
use crate::lifecycle::ShutdownSignal;

pub use proxy::{rewrite_uri, GatewayError, GatewayState};

/// HTTP front door that forwards a path prefix to the catalog service.
pub struct GatewayServer {
    router: Router,
    config: ServiceConfig,
}

impl GatewayServer {
    pub fn new(config: ServiceConfig) -> Result<Self, GatewayError> {
        let upstream = config
            .gateway
            .upstream
            .parse()
            .map_err(|_| GatewayError::InvalidUpstream(config.gateway.upstream.clone()))?;
        let timeout = Duration::from_secs(config.gateway.upstream_timeout_secs);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = GatewayState {
            client,
            upstream,
            prefix: Arc::from(config.gateway.path_prefix.as_str()),
            timeout,
            service_name: Arc::from(config.gateway.service_name.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    fn build_router(config: &ServiceConfig, state: GatewayState) -> Router {
        let prefix = config.gateway.path_prefix.as_str();
        let routes = Router::new()
            .route("/health", get(gateway_health))
            .route(prefix, any(proxy::forward))
            .route(&format!("{prefix}/"), any(proxy::forward))
            .route(&format!("{prefix}/{{*rest}}"), any(proxy::forward))
            .route_layer(middleware::from_fn(track_metrics))
            .with_state(state);

        with_common_layers(routes, config)
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.gateway.upstream,
            prefix = %self.config.gateway.path_prefix,
            "API gateway starting"
        );

        serve(listener, self.router, shutdown).await?;

        tracing::info!("API gateway stopped");
        Ok(())
    }
}

async fn gateway_health(State(state): State<GatewayState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: state.service_name.to_string(),
    })
}
