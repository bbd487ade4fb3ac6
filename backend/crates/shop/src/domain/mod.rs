//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entities;
pub mod repository;
pub mod value_objects;

// Re-exports
pub use entities::{Cart, CartItem, CartLine, Product};
pub use repository::{CartQueryRepository, CartStore, CartTransaction, ProductRepository};
