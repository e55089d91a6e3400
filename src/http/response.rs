//! Error-to-response mapping.
//!
//! # Responsibilities
//! - Translate domain and extraction failures into HTTP status codes
//! - Render every error as a `{"detail": ...}` JSON body
//!
//! # Design Decisions
//! - `NotFound` carries a fixed, human-readable message; the id is logged, not returned
//! - Path parameters that fail to parse are 422, before any handler logic runs
//! - Unrouted paths answer 404 with the same body shape

use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::catalog::CatalogError;

/// Errors surfaced by the catalog HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("{0}")]
    InvalidPath(String),

    #[error("Not Found")]
    RouteNotFound,
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ProductNotFound | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidPath(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => ApiError::ProductNotFound,
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
