//! Cross-origin resource sharing policy.
//!
//! # Responsibilities
//! - Build the `CorsLayer` shared by the catalog service and the gateway
//! - Translate `CorsConfig` into allowed origins, methods and headers
//!
//! # Design Decisions
//! - Browsers reject `Access-Control-Allow-Origin: *` together with
//!   credentials, so the permissive policy mirrors the request origin instead
//! - Methods and headers are always mirrored; only origins are restricted

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer for `config`.
///
/// Origins that are not valid header values are skipped (validation rejects
/// them before a config is accepted).
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origin = if config.allows_any_origin() {
        if config.allow_credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
}
