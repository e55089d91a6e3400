//! Product record and the seed data the service starts with.

use serde::{Deserialize, Serialize};

/// Catalog-unique product identifier.
pub type ProductId = u64;

/// A single catalog entry.
///
/// Serialized as `{id, name, description, price, stock}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in the store currency.
    pub price: f64,
    /// Units on hand.
    pub stock: u32,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            stock,
        }
    }

    /// Case-insensitive substring match against the product name.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }
}

/// The six records every catalog instance is seeded with, in seed order.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new(1, "Laptop", "High performance laptop", 999.99, 10),
        Product::new(2, "Smartphone", "Latest smartphone", 699.99, 25),
        Product::new(3, "Headphones", "Noise cancelling headphones", 199.99, 50),
        Product::new(4, "Smartwatch", "Fitness tracking smartwatch", 299.99, 30),
        Product::new(5, "Tablet", "10-inch tablet", 449.99, 15),
        Product::new(6, "Camera", "Digital camera 4K", 799.99, 8),
    ]
}
