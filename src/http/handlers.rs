//! Catalog route handlers.
//!
//! Every handler is a read against the shared `Arc<Catalog>`; none mutates it.

use std::num::IntErrorKind;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use serde::Serialize;

use crate::catalog::{Product, ProductId};
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: state.info.title.clone(),
        version: state.info.version.clone(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: state.info.name.clone(),
    })
}

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog.list().to_vec())
}

/// `GET /products/{product_id}`.
///
/// Any integer is accepted, however large: ids outside the stored range
/// cannot name a product and are a plain 404 rather than a parse failure.
pub async fn get_product(
    State(state): State<AppState>,
    product_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Product>, ApiError> {
    let Path(raw_id) = product_id?;
    let id = parse_product_id(&raw_id)?;

    match state.catalog.get(id) {
        Ok(product) => Ok(Json(product.clone())),
        Err(err) => {
            tracing::debug!(product_id = %raw_id, error = %err, "Product lookup failed");
            Err(err.into())
        }
    }
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    let value = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                return Err(ApiError::ProductNotFound)
            }
            _ => return Err(ApiError::InvalidPath(format!("product_id: {raw:?} is not an integer"))),
        },
    };
    ProductId::try_from(value).map_err(|_| ApiError::ProductNotFound)
}

/// `GET /products/search/{query}`.
///
/// A query that does not decode to UTF-8 is rejected with the same 422 body
/// as any other malformed path parameter.
pub async fn search_products(
    State(state): State<AppState>,
    query: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let Path(query) = query?;
    let matches: Vec<Product> = state.catalog.search(&query).into_iter().cloned().collect();
    tracing::debug!(query = %query, matches = matches.len(), "Product search");
    Ok(Json(matches))
}

/// Fallback for paths no route matches.
pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ServiceConfig;
    use crate::http::HttpServer;

    fn app() -> Router {
        HttpServer::new(ServiceConfig::default()).router()
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn names(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn root_reports_name_and_version() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Ecommerce Backend API", "version": "1.0.0"}));
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "healthy", "service": "backend"}));
    }

    #[tokio::test]
    async fn list_returns_seed_order() {
        let (status, body) = get("/products").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            names(&body),
            vec!["Laptop", "Smartphone", "Headphones", "Smartwatch", "Tablet", "Camera"]
        );
    }

    #[tokio::test]
    async fn get_existing_product() {
        let (status, body) = get("/products/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "id": 1,
                "name": "Laptop",
                "description": "High performance laptop",
                "price": 999.99,
                "stock": 10
            })
        );
    }

    #[tokio::test]
    async fn get_missing_product_is_404() {
        for uri in ["/products/999", "/products/0", "/products/-3"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({"detail": "Product not found"}));
        }
    }

    #[tokio::test]
    async fn oversized_id_is_404_not_a_parse_error() {
        for uri in ["/products/99999999999999999999", "/products/-99999999999999999999"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({"detail": "Product not found"}));
        }
    }

    #[tokio::test]
    async fn non_integer_id_is_rejected_before_lookup() {
        for uri in ["/products/laptop", "/products/1.5", "/products/%201"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert!(body["detail"].is_string());
        }
    }

    #[tokio::test]
    async fn search_is_case_insensitive() {
        for uri in ["/products/search/LAPTOP", "/products/search/laptop", "/products/search/LapTop"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(names(&body), vec!["Laptop"], "{uri}");
        }
    }

    #[tokio::test]
    async fn search_phone_matches_by_substring() {
        let (_, body) = get("/products/search/phone").await;
        assert_eq!(names(&body), vec!["Smartphone", "Headphones"]);

        let (_, body) = get("/products/search/smartp").await;
        assert_eq!(names(&body), vec!["Smartphone"]);
    }

    #[tokio::test]
    async fn search_decodes_percent_escapes() {
        let (status, body) = get("/products/search/camera%204").await;
        assert_eq!(status, StatusCode::OK);
        assert!(names(&body).is_empty());

        let (_, body) = get("/products/search/Smart%57atch").await;
        assert_eq!(names(&body), vec!["Smartwatch"]);
    }

    #[tokio::test]
    async fn search_with_invalid_utf8_is_json_422() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/products/search/%FF")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.headers()["content-type"], "application/json");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["detail"].as_str().unwrap().contains("UTF-8"));
    }

    #[tokio::test]
    async fn unmatched_paths_share_the_error_shape() {
        for uri in ["/nope", "/products/search/", "/products/1/extra"] {
            let (status, body) = get(uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, json!({"detail": "Not Found"}));
        }
    }

    #[tokio::test]
    async fn search_without_match_is_empty_list() {
        let (status, body) = get("/products/search/xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(crate::http::X_REQUEST_ID));
    }

    #[tokio::test]
    async fn cors_echoes_origin_with_credentials() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/products")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            "http://localhost:5173"
        );
        assert_eq!(headers["access-control-allow-credentials"], "true");
    }
}
