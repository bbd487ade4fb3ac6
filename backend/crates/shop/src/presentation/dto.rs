//! API DTOs (Data Transfer Objects)

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::{CartProduct, CartView};
use crate::domain::entities::Product;

// ============================================================================
// Cart
// ============================================================================

/// Add item request
#[derive(Debug, Clone, Deserialize)]
pub struct AddItemRequest {
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub cart_name: String,
}

/// View cart request
#[derive(Debug, Clone, Deserialize)]
pub struct ViewCartRequest {
    pub customer_id: i64,
    pub cart_name: String,
}

/// View cart response
#[derive(Debug, Clone, Serialize)]
pub struct CartViewResponse {
    pub cart_name: String,
    pub products: Vec<CartProductResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartProductResponse {
    pub product_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
}

impl From<CartView> for CartViewResponse {
    fn from(view: CartView) -> Self {
        Self {
            cart_name: view.cart_name,
            products: view.products.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<CartProduct> for CartProductResponse {
    fn from(product: CartProduct) -> Self {
        Self {
            product_id: product.product_id.get(),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Search query string; absent and empty parameters mean "no filter"
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchProductsQuery {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<Decimal>,
}

/// Product in search results
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub product_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.product_id.get(),
            name: product.name,
            price: product.price.amount(),
        }
    }
}

// ============================================================================
// Common
// ============================================================================

/// Plain acknowledgement or explanation
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `?min_price=` from an empty form field is treated as absent
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
