//! Common ID Types
//!
//! Type-safe wrappers around the positive `BIGINT` keys used by the
//! relational schema. A `CustomerId` can never be passed where a
//! `ProductId` is expected.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use thiserror::Error;

use crate::error::app_error::AppError;

/// Rejected identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{name} must be a positive integer (got {value})")]
pub struct IdError {
    pub name: &'static str,
    pub value: i64,
}

impl From<IdError> for AppError {
    fn from(err: IdError) -> Self {
        AppError::bad_request(err.to_string())
    }
}

/// Entity marker carrying the field name used in error messages
pub trait IdMarker {
    const NAME: &'static str;
}

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::CustomerId;
/// let id = CustomerId::new(1).unwrap();
/// assert_eq!(id.get(), 1);
/// assert!(CustomerId::new(0).is_err());
/// ```
pub struct Id<T> {
    value: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T: IdMarker> Id<T> {
    /// Validate an id coming from a client
    pub fn new(value: i64) -> Result<Self, IdError> {
        if value <= 0 {
            return Err(IdError {
                name: T::NAME,
                value,
            });
        }
        Ok(Self::from_db(value))
    }
}

impl<T> Id<T> {
    /// Wrap a key read back from the database (assumed valid)
    pub const fn from_db(value: i64) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub const fn get(&self) -> i64 {
        self.value
    }
}

// Manual impls: derives would demand the same traits from the marker type.
impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    use super::IdMarker;

    pub struct Customer;
    pub struct Product;
    pub struct Cart;
    pub struct CartItem;

    impl IdMarker for Customer {
        const NAME: &'static str = "customer_id";
    }

    impl IdMarker for Product {
        const NAME: &'static str = "product_id";
    }

    impl IdMarker for Cart {
        const NAME: &'static str = "cart_id";
    }

    impl IdMarker for CartItem {
        const NAME: &'static str = "cart_item_id";
    }
}

pub type CustomerId = Id<markers::Customer>;
pub type ProductId = Id<markers::Product>;
pub type CartId = Id<markers::Cart>;
pub type CartItemId = Id<markers::CartItem>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        assert!(CustomerId::new(0).is_err());
        let err = ProductId::new(-3).unwrap_err();
        assert_eq!(err.to_string(), "product_id must be a positive integer (got -3)");
    }

    #[test]
    fn test_accepts_positive() {
        let id = CartId::new(42).unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_copy_and_eq_without_marker_bounds() {
        let a = CustomerId::from_db(7);
        let b = a;
        assert_eq!(a, b);
        assert!(CustomerId::from_db(1) < CustomerId::from_db(2));
    }

    #[test]
    fn test_id_error_maps_to_bad_request() {
        let app: AppError = CustomerId::new(0).unwrap_err().into();
        assert_eq!(app.status_code(), 400);
    }
}
