//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (read, deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → moved into the server at startup
//! ```
//!
//! # Design Decisions
//! - Every field has a default, so running without a file is valid
//! - Validation separates syntactic (serde) from semantic checks
//! - No hot reload: the catalog and its surface are fixed for the process lifetime

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CorsConfig, GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, ServiceConfig,
    ServiceInfoConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
