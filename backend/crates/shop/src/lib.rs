//! Shop (Cart and Catalog) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Consistency Model
//! - Add-to-cart runs in one transaction and holds the cart row lock, so
//!   concurrent adds to the same cart never lose a quantity update
//! - `(customer_id, cart_name)` and `(cart_id, product_id)` are unique in
//!   the schema as well as in the code paths

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::ShopConfig;
pub use error::{ShopError, ShopResult};
pub use infra::{memory::InMemoryShopStore, postgres::PgShopRepository};
pub use presentation::router::{shop_router, shop_router_generic};

mod tests;
