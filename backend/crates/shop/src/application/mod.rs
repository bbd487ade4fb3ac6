//! Application Layer
//!
//! Use cases.

pub mod add_item;
pub mod config;
pub mod search_products;
pub mod view_cart;

// Re-exports
pub use add_item::{AddItemInput, AddItemUseCase};
pub use config::ShopConfig;
pub use search_products::{SearchProductsInput, SearchProductsUseCase};
pub use view_cart::{CartProduct, CartView, ViewCartInput, ViewCartUseCase};
