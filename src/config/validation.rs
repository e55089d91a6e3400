//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Keep the upstream timeout inside the request timeout
//! - Check that CORS origins and the gateway upstream are usable as-is
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderValue, Uri};

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: must be greater than zero")]
    ZeroDuration { field: &'static str },

    #[error("{field}: must not be empty")]
    Empty { field: &'static str },

    #[error("cors.allowed_origins: {0:?} is not a valid origin header value")]
    InvalidOrigin(String),

    #[error("gateway.upstream: {0:?} must be an absolute http:// URL")]
    InvalidUpstream(String),

    #[error("gateway.path_prefix: {0:?} must start with '/', name a segment and not end with '/'")]
    InvalidPrefix(String),

    #[error(
        "timeouts.request_secs ({request_secs}) must exceed gateway.upstream_timeout_secs ({upstream_secs}) \
         so upstream timeouts surface as gateway errors"
    )]
    UpstreamTimeoutNotShorter { request_secs: u64, upstream_secs: u64 },
}

/// Check a deserialized config, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_address(&mut errors, "gateway.bind_address", &config.gateway.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "timeouts.request_secs",
        });
    }
    if config.gateway.upstream_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration {
            field: "gateway.upstream_timeout_secs",
        });
    }
    // The request timeout wraps the proxy call; it must fire second.
    let (request_secs, upstream_secs) =
        (config.timeouts.request_secs, config.gateway.upstream_timeout_secs);
    if request_secs > 0 && upstream_secs > 0 && request_secs <= upstream_secs {
        errors.push(ValidationError::UpstreamTimeoutNotShorter {
            request_secs,
            upstream_secs,
        });
    }

    if config.service.version.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "service.version",
        });
    }
    if config.service.name.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "service.name",
        });
    }

    if !config.cors.allows_any_origin() {
        for origin in &config.cors.allowed_origins {
            if HeaderValue::from_str(origin).is_err() {
                errors.push(ValidationError::InvalidOrigin(origin.clone()));
            }
        }
    }

    let upstream_ok = config
        .gateway
        .upstream
        .parse::<Uri>()
        .map(|uri| uri.scheme_str() == Some("http") && uri.authority().is_some())
        .unwrap_or(false);
    if !upstream_ok {
        errors.push(ValidationError::InvalidUpstream(config.gateway.upstream.clone()));
    }

    let prefix = &config.gateway.path_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        errors.push(ValidationError::InvalidPrefix(prefix.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
