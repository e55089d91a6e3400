//! Immutable in-memory product store.
//!
//! # Responsibilities
//! - Hold the product list in seed order
//! - Answer list, lookup-by-id and name-search queries
//! - Reject duplicate ids at construction time

use std::collections::HashSet;

use crate::catalog::product::{seed_products, Product, ProductId};

/// Errors raised by catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No product carries the requested id.
    #[error("product {0} not found")]
    NotFound(ProductId),
}

/// Two products passed to [`Catalog::from_products`] share an id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate product id {0}")]
pub struct DuplicateId(pub ProductId);

/// Read-only product catalog.
///
/// There is no mutation API; share it behind an `Arc` and read concurrently.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build the catalog from the fixed seed list.
    pub fn seeded() -> Self {
        Self {
            products: seed_products(),
        }
    }

    /// Build a catalog from an arbitrary product list, preserving its order.
    pub fn from_products(products: Vec<Product>) -> Result<Self, DuplicateId> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// All products, in seed order.
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// First product whose id equals `id`.
    pub fn get(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(CatalogError::NotFound(id))
    }

    /// Products whose name contains `query`, ignoring case, in seed order.
    ///
    /// The empty query is a substring of every name and therefore matches
    /// the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name_contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}
