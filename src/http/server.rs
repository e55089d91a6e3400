//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the catalog once and share it with every handler
//! - Create the Axum router (method + path pattern → handler)
//! - Wire up middleware (request ID, tracing, CORS, timeout, metrics)
//! - Serve on a bound listener until shutdown is signalled

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::catalog::Catalog;
use crate::config::{ServiceConfig, ServiceInfoConfig};
use crate::http::handlers;
use crate::http::middleware::track_metrics;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::ShutdownSignal;
use crate::observability::tracing::make_request_span;
use crate::security::cors_layer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub info: Arc<ServiceInfoConfig>,
}

/// HTTP server for the product catalog.
pub struct HttpServer {
    router: Router,
    catalog: Arc<Catalog>,
}

impl HttpServer {
    /// Create a server over the seeded catalog.
    pub fn new(config: ServiceConfig) -> Self {
        Self::with_catalog(config, Catalog::seeded())
    }

    /// Create a server over an explicit catalog.
    pub fn with_catalog(config: ServiceConfig, catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let state = AppState {
            catalog: catalog.clone(),
            info: Arc::new(config.service.clone()),
        };

        let router = Self::build_router(&config, state);
        Self { router, catalog }
    }

    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let routes = Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/products", get(handlers::list_products))
            .route("/products/{product_id}", get(handlers::get_product))
            .route("/products/search/{query}", get(handlers::search_products))
            .route_layer(middleware::from_fn(track_metrics))
            .fallback(handlers::not_found)
            .with_state(state);

        with_common_layers(routes, config)
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            products = self.catalog.len(),
            "Catalog service starting"
        );

        serve(listener, self.router, shutdown).await?;

        tracing::info!("Catalog service stopped");
        Ok(())
    }
}

/// Middleware shared by every listener, outermost last.
#[allow(deprecated)]
pub(crate) fn with_common_layers(router: Router, config: &ServiceConfig) -> Router {
    router
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}

/// Serve `router` until `shutdown` fires, then drain in-flight requests.
pub(crate) async fn serve(
    listener: TcpListener,
    router: Router,
    shutdown: ShutdownSignal,
) -> Result<(), std::io::Error> {
    let app = router.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.wait().await;
            tracing::info!("Shutdown signal received, draining connections");
        })
        .await
}
