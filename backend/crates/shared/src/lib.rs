//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the `auth` and `shop` crates:
//! - The unified [`error::app_error::AppError`] and its HTTP classification
//! - Typed integer identifiers for customers, products and carts
//! - Request extractors that report malformed input as `400 Bad Request`
//!
//! Only things whose meaning is identical in every domain belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
