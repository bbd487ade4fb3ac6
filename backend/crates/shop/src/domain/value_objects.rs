//! Domain Value Objects
//!
//! Immutable value types for carts and the catalog.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use rust_decimal::Decimal;

use crate::domain::entities::Product;
use crate::error::{ShopError, ShopResult};

// ============================================================================
// Cart Name
// ============================================================================

/// Name of one of a customer's carts ("default", "wishlist", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CartName(String);

impl CartName {
    pub const MAX_LENGTH: usize = 100;

    pub fn new(raw: &str) -> AppResult<Self> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(AppError::bad_request("Cart name cannot be empty"));
        }

        if name.chars().count() > Self::MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Cart name must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AppError::bad_request("Cart name contains invalid characters"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Quantity
// ============================================================================

/// Positive line-item quantity, stored as `INTEGER`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i32);

impl Quantity {
    /// Validate a quantity requested in a single add
    pub fn for_add(requested: i64, max_per_add: i32) -> ShopResult<Self> {
        if requested < 1 {
            return Err(ShopError::InvalidQuantity(
                "quantity must be at least 1".to_string(),
            ));
        }
        if requested > i64::from(max_per_add) {
            return Err(ShopError::InvalidQuantity(format!(
                "quantity must be at most {}",
                max_per_add
            )));
        }
        // max_per_add is an i32, so the cast cannot truncate
        Ok(Self(requested as i32))
    }

    pub const fn from_db(value: i32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i32 {
        self.0
    }

    /// Sum of two quantities; fails instead of wrapping
    pub fn checked_add(self, other: Quantity) -> ShopResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| ShopError::InvalidQuantity("cart quantity limit exceeded".to_string()))
    }
}

// ============================================================================
// Price
// ============================================================================

/// Non-negative product price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    pub fn new(amount: Decimal) -> AppResult<Self> {
        if amount < Decimal::ZERO {
            return Err(AppError::bad_request("Price cannot be negative"));
        }
        Ok(Self(amount))
    }

    pub const fn from_db(amount: Decimal) -> Self {
        Self(amount)
    }

    pub const fn amount(self) -> Decimal {
        self.0
    }
}

// ============================================================================
// Product Filter
// ============================================================================

/// Optional catalog search criteria
///
/// A missing field means "no bound"; `0` is a real bound.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    name: Option<String>,
    min_price: Option<Price>,
    max_price: Option<Price>,
}

impl ProductFilter {
    pub const MAX_NAME_LENGTH: usize = 100;

    pub fn new(
        name: Option<String>,
        min_price: Option<Decimal>,
        max_price: Option<Decimal>,
    ) -> AppResult<Self> {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if name
            .as_ref()
            .is_some_and(|n| n.chars().count() > Self::MAX_NAME_LENGTH)
        {
            return Err(AppError::bad_request(format!(
                "Search name must be at most {} characters",
                Self::MAX_NAME_LENGTH
            )));
        }

        Ok(Self {
            name,
            min_price: min_price.map(Price::new).transpose()?,
            max_price: max_price.map(Price::new).transpose()?,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn min_price(&self) -> Option<Decimal> {
        self.min_price.map(Price::amount)
    }

    pub fn max_price(&self) -> Option<Decimal> {
        self.max_price.map(Price::amount)
    }

    /// `min_price > max_price` can never match anything
    pub fn is_unsatisfiable(&self) -> bool {
        matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max)
    }

    /// `ILIKE` pattern for a substring match with user wildcards escaped
    pub fn name_pattern(&self) -> Option<String> {
        self.name.as_deref().map(|name| {
            let mut pattern = String::with_capacity(name.len() + 2);
            pattern.push('%');
            for ch in name.chars() {
                if matches!(ch, '\\' | '%' | '_') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        })
    }

    /// Same predicate as the SQL query, for non-database stores
    pub fn matches(&self, product: &Product) -> bool {
        let name_ok = self.name.as_deref().is_none_or(|needle| {
            product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        });
        let min_ok = self.min_price.is_none_or(|min| product.price >= min);
        let max_ok = self.max_price.is_none_or(|max| product.price <= max);

        name_ok && min_ok && max_ok
    }
}
