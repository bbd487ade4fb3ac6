//! Add Item Use Case
//!
//! Finds or creates the named cart, then finds or creates the line item,
//! accumulating the quantity on repeated adds.

use std::sync::Arc;

use kernel::id::{CustomerId, ProductId};

use crate::application::config::ShopConfig;
use crate::domain::entities::CartItem;
use crate::domain::repository::{CartStore, CartTransaction};
use crate::domain::value_objects::{CartName, Quantity};
use crate::error::{ShopError, ShopResult};

/// Add item input
pub struct AddItemInput {
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub cart_name: String,
}

/// Add item use case
pub struct AddItemUseCase<S>
where
    S: CartStore,
{
    store: Arc<S>,
    config: Arc<ShopConfig>,
}

impl<S> AddItemUseCase<S>
where
    S: CartStore,
{
    pub fn new(store: Arc<S>, config: Arc<ShopConfig>) -> Self {
        Self { store, config }
    }

    /// Returns the line item as stored after the add
    pub async fn execute(&self, input: AddItemInput) -> ShopResult<CartItem> {
        let customer_id = CustomerId::new(input.customer_id)?;
        let product_id = ProductId::new(input.product_id)?;
        let quantity = Quantity::for_add(input.quantity, self.config.max_quantity_per_add)?;
        let cart_name = CartName::new(&input.cart_name)?;

        // Rolled back on drop if any step below fails
        let mut tx = self.store.begin().await?;

        if !tx.customer_exists(customer_id).await? {
            return Err(ShopError::CustomerNotFound);
        }

        if tx.find_product(product_id).await?.is_none() {
            return Err(ShopError::ProductNotFound);
        }

        let cart = tx.lock_or_create_cart(customer_id, &cart_name).await?;

        let item = match tx.find_item(cart.cart_id, product_id).await? {
            Some(mut item) => {
                item.add(quantity)?;
                tx.update_item_quantity(item.cart_item_id, item.quantity)
                    .await?;
                item
            }
            None => tx.insert_item(cart.cart_id, product_id, quantity).await?,
        };

        tx.commit().await?;

        tracing::info!(
            customer_id = %customer_id,
            cart_id = %cart.cart_id,
            product_id = %product_id,
            added = quantity.get(),
            quantity = item.quantity.get(),
            "Added item to cart"
        );

        Ok(item)
    }
}
