//! In-memory product catalog service with an optional API gateway.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use catalog::{Catalog, CatalogError, Product};
pub use config::ServiceConfig;
pub use gateway::GatewayServer;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
