//! Application Configuration
//!
//! Configuration for the Shop application layer.

/// Shop application configuration
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Largest quantity accepted in a single add-to-cart request
    pub max_quantity_per_add: i32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            max_quantity_per_add: 10_000,
        }
    }
}
