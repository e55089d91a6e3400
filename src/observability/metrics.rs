//! Metrics collection and exposition.
//!
//! # Metrics
//! - `catalog_http_requests_total` (counter): requests by method, route, status
//! - `catalog_http_request_duration_seconds` (histogram): latency distribution
//! - `catalog_gateway_upstream_errors_total` (counter): failed upstream exchanges
//!
//! Routes are labelled with the matched pattern (`/products/{product_id}`),
//! never the raw path, to keep label cardinality bounded.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const REQUESTS_TOTAL: &str = "catalog_http_requests_total";
pub const REQUEST_DURATION: &str = "catalog_http_request_duration_seconds";
pub const UPSTREAM_ERRORS: &str = "catalog_gateway_upstream_errors_total";

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!(REQUESTS_TOTAL, &labels).increment(1);
    metrics::histogram!(REQUEST_DURATION, &labels).record(start.elapsed().as_secs_f64());
}

/// Record an upstream failure seen by the gateway.
pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!(UPSTREAM_ERRORS, "kind" => kind).increment(1);
}
