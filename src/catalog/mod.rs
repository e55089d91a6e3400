//! Product catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     product.rs (seed records)
//!     → store.rs (Catalog::seeded, id uniqueness checked)
//!     → Arc<Catalog> handed to the HTTP layer
//!
//! Per request:
//!     handler → Catalog::{list, get, search} → borrowed &Product(s)
//! ```
//!
//! # Design Decisions
//! - Catalog is built once and never mutated; reads need no locking
//! - Lookups are linear scans in seed order (six records)
//! - Only `get` can fail, and only with `NotFound`

pub mod product;
pub mod store;

pub use product::{Product, ProductId};
pub use store::{Catalog, CatalogError, DuplicateId};
