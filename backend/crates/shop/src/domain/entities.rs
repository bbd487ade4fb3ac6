//! Domain Entities

use kernel::id::{CartId, CartItemId, CustomerId, ProductId};

use crate::domain::value_objects::{CartName, Price, Quantity};
use crate::error::ShopResult;

/// Catalog product (read-only in this service)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
}

/// Named cart owned by a customer; `(customer_id, cart_name)` is unique
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub cart_id: CartId,
    pub customer_id: CustomerId,
    pub cart_name: CartName,
}

/// One product line in a cart; `(cart_id, product_id)` is unique
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub cart_item_id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: Quantity,
}

impl CartItem {
    /// Accumulate a repeated add of the same product
    pub fn add(&mut self, quantity: Quantity) -> ShopResult<()> {
        self.quantity = self.quantity.checked_add(quantity)?;
        Ok(())
    }
}

/// Cart item joined with its product
///
/// `product` is `None` when the product row no longer exists.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub item: CartItem,
    pub product: Option<Product>,
}
