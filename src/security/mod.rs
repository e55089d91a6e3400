//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (preflight answers, origin checks, response headers)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - One policy definition shared by every listener
//! - Development default is fully permissive; production restricts origins

pub mod cors;

pub use cors::cors_layer;
