//! Request forwarding to the upstream catalog service.
//!
//! # Responsibilities
//! - Rewrite `/<prefix>/rest?query` to `<upstream>/rest?query`
//! - Point `Host` at the upstream and append `X-Forwarded-For`
//! - Strip hop-by-hop headers in both directions
//! - Bound each exchange with the configured upstream timeout

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        Request, Uri, Version,
    },
    response::{IntoResponse, Response},
    Json,
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};

use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// State shared by the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub client: Client<HttpConnector, Body>,
    /// Upstream base URI (scheme, authority and optional base path).
    pub upstream: Uri,
    pub prefix: Arc<str>,
    pub timeout: Duration,
    pub service_name: Arc<str>,
}

/// Failures while forwarding a request.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid upstream URL {0:?}")]
    InvalidUpstream(String),

    #[error("failed to build upstream URI: {0}")]
    Uri(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
}

impl GatewayError {
    fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidUpstream(_) | GatewayError::Uri(_) => "uri",
            GatewayError::Upstream(_) => "connect",
            GatewayError::Timeout(_) => "timeout",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, kind = self.kind(), "Proxy error");
        metrics::record_upstream_error(self.kind());
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "Gateway error" })),
        )
            .into_response()
    }
}

/// Map an incoming URI onto the upstream by stripping `prefix`.
///
/// `/api` and `/api/` both become the upstream root.
pub fn rewrite_uri(upstream: &Uri, prefix: &str, incoming: &Uri) -> Result<Uri, GatewayError> {
    let path = incoming.path();
    let rest = path.strip_prefix(prefix).unwrap_or(path);
    let rest = if rest.is_empty() { "/" } else { rest };

    let base = upstream.path().trim_end_matches('/');
    let path_and_query = match incoming.query() {
        Some(query) => format!("{base}{rest}?{query}"),
        None => format!("{base}{rest}"),
    };

    let mut builder = Uri::builder().path_and_query(path_and_query);
    if let Some(scheme) = upstream.scheme() {
        builder = builder.scheme(scheme.clone());
    }
    if let Some(authority) = upstream.authority() {
        builder = builder.authority(authority.clone());
    }
    Ok(builder.build()?)
}

/// Remove connection-scoped headers, including any named by `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

fn append_forwarded_for(headers: &mut HeaderMap, client: SocketAddr) {
    let ip = client.ip().to_string();
    let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(existing) => format!("{existing}, {ip}"),
        None => ip,
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}

/// Forward any request under the prefix to the upstream.
pub async fn forward(State(state): State<GatewayState>, request: Request<Body>) -> Response {
    match proxy(&state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn proxy(state: &GatewayState, request: Request<Body>) -> Result<Response, GatewayError> {
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let (mut parts, body) = request.into_parts();

    let uri = rewrite_uri(&state.upstream, &state.prefix, &parts.uri)?;
    let request_id = parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_owned();

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        from = %parts.uri,
        to = %uri,
        "Forwarding request"
    );

    strip_hop_by_hop(&mut parts.headers);
    if let Some(authority) = uri.authority() {
        if let Ok(host) = HeaderValue::from_str(authority.as_str()) {
            parts.headers.insert(header::HOST, host);
        }
    }
    if let Some(addr) = client_addr {
        append_forwarded_for(&mut parts.headers, addr);
    }
    parts.uri = uri;
    parts.version = Version::HTTP_11;

    let upstream_request = Request::from_parts(parts, body);
    let response: hyper::Response<hyper::body::Incoming> =
        tokio::time::timeout(state.timeout, state.client.request(upstream_request))
            .await
            .map_err(|_| GatewayError::Timeout(state.timeout))??;

    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(upstream: &str, incoming: &str) -> String {
        let upstream: Uri = upstream.parse().unwrap();
        let incoming: Uri = incoming.parse().unwrap();
        rewrite_uri(&upstream, "/api", &incoming).unwrap().to_string()
    }

    #[test]
    fn strips_prefix() {
        assert_eq!(
            rewrite("http://localhost:3000", "/api/products/1"),
            "http://localhost:3000/products/1"
        );
    }

    #[test]
    fn bare_prefix_maps_to_root() {
        assert_eq!(rewrite("http://localhost:3000", "/api"), "http://localhost:3000/");
        assert_eq!(rewrite("http://localhost:3000", "/api/"), "http://localhost:3000/");
    }

    #[test]
    fn keeps_query_and_encoding() {
        assert_eq!(
            rewrite("http://catalog:3000", "/api/products/search/smart%20watch?debug=1"),
            "http://catalog:3000/products/search/smart%20watch?debug=1"
        );
    }

    #[test]
    fn joins_upstream_base_path() {
        assert_eq!(
            rewrite("http://catalog:3000/v1/", "/api/health"),
            "http://catalog:3000/v1/health"
        );
    }

    #[test]
    fn forwarded_for_is_appended() {
        let mut headers = HeaderMap::new();
        append_forwarded_for(&mut headers, "10.0.0.1:5000".parse().unwrap());
        append_forwarded_for(&mut headers, "10.0.0.2:5000".parse().unwrap());
        assert_eq!(headers[X_FORWARDED_FOR], "10.0.0.1, 10.0.0.2");
    }

    #[test]
    fn hop_by_hop_headers_are_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        strip_hop_by_hop(&mut headers);
        assert!(!headers.contains_key(header::CONNECTION));
        assert!(headers.contains_key(header::ACCEPT));
    }

    #[test]
    fn connection_listed_and_legacy_headers_are_removed() {
        let mut headers = HeaderMap::new();
        headers.append(header::CONNECTION, HeaderValue::from_static("keep-alive, X-Trace-Hop"));
        headers.append(header::CONNECTION, HeaderValue::from_static("x-debug-token"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("proxy-connection", HeaderValue::from_static("keep-alive"));
        headers.insert("x-trace-hop", HeaderValue::from_static("1"));
        headers.insert("x-debug-token", HeaderValue::from_static("abc"));
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("req-1"));

        strip_hop_by_hop(&mut headers);

        for name in ["connection", "keep-alive", "proxy-connection", "x-trace-hop", "x-debug-token"] {
            assert!(!headers.contains_key(name), "{name} should be stripped");
        }
        assert_eq!(headers[X_REQUEST_ID], "req-1");
    }
}
