//! In-memory shop store
//!
//! Implements every shop repository trait over one mutex-guarded state.
//! A transaction holds the mutex for its whole lifetime and works on a
//! copy that replaces the shared state on commit, so an abandoned
//! transaction leaves no trace.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use kernel::id::{CartId, CartItemId, CustomerId, ProductId};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::entities::{Cart, CartItem, CartLine, Product};
use crate::domain::repository::{
    CartQueryRepository, CartStore, CartTransaction, ProductRepository,
};
use crate::domain::value_objects::{CartName, Price, ProductFilter, Quantity};
use crate::error::{ShopError, ShopResult};

#[derive(Debug, Clone, Default)]
struct ShopState {
    customers: HashSet<CustomerId>,
    products: BTreeMap<ProductId, Product>,
    carts: BTreeMap<CartId, Cart>,
    items: BTreeMap<CartItemId, CartItem>,
    last_cart_id: i64,
    last_cart_item_id: i64,
}

impl ShopState {
    fn find_cart(&self, customer_id: CustomerId, cart_name: &CartName) -> Option<&Cart> {
        self.carts
            .values()
            .find(|c| c.customer_id == customer_id && &c.cart_name == cart_name)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryShopStore {
    state: Arc<Mutex<ShopState>>,
}

impl InMemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_customer(&self, customer_id: i64) {
        self.state
            .lock()
            .await
            .customers
            .insert(CustomerId::from_db(customer_id));
    }

    pub async fn insert_product(&self, product_id: i64, name: &str, price: Decimal) {
        let product = Product {
            product_id: ProductId::from_db(product_id),
            name: name.to_string(),
            price: Price::from_db(price),
        };
        self.state
            .lock()
            .await
            .products
            .insert(product.product_id, product);
    }

    /// Delete a product while leaving cart items that reference it
    pub async fn remove_product(&self, product_id: i64) {
        self.state
            .lock()
            .await
            .products
            .remove(&ProductId::from_db(product_id));
    }

    pub async fn cart_count(&self) -> usize {
        self.state.lock().await.carts.len()
    }
}

impl ProductRepository for InMemoryShopStore {
    async fn search(&self, filter: &ProductFilter) -> ShopResult<Vec<Product>> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}

impl CartQueryRepository for InMemoryShopStore {
    async fn customer_exists(&self, customer_id: CustomerId) -> ShopResult<bool> {
        Ok(self.state.lock().await.customers.contains(&customer_id))
    }

    async fn find_cart(
        &self,
        customer_id: CustomerId,
        cart_name: &CartName,
    ) -> ShopResult<Option<Cart>> {
        Ok(self
            .state
            .lock()
            .await
            .find_cart(customer_id, cart_name)
            .cloned())
    }

    async fn list_lines(&self, cart_id: CartId) -> ShopResult<Vec<CartLine>> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.cart_id == cart_id)
            .map(|item| CartLine {
                item: item.clone(),
                product: state.products.get(&item.product_id).cloned(),
            })
            .collect())
    }
}

impl CartStore for InMemoryShopStore {
    type Tx = InMemoryCartTransaction;

    async fn begin(&self) -> ShopResult<Self::Tx> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(InMemoryCartTransaction { guard, working })
    }
}

pub struct InMemoryCartTransaction {
    guard: OwnedMutexGuard<ShopState>,
    working: ShopState,
}

impl CartTransaction for InMemoryCartTransaction {
    async fn customer_exists(&mut self, customer_id: CustomerId) -> ShopResult<bool> {
        Ok(self.working.customers.contains(&customer_id))
    }

    async fn find_product(&mut self, product_id: ProductId) -> ShopResult<Option<Product>> {
        Ok(self.working.products.get(&product_id).cloned())
    }

    async fn lock_or_create_cart(
        &mut self,
        customer_id: CustomerId,
        cart_name: &CartName,
    ) -> ShopResult<Cart> {
        if let Some(cart) = self.working.find_cart(customer_id, cart_name) {
            return Ok(cart.clone());
        }

        self.working.last_cart_id += 1;
        let cart = Cart {
            cart_id: CartId::from_db(self.working.last_cart_id),
            customer_id,
            cart_name: cart_name.clone(),
        };
        self.working.carts.insert(cart.cart_id, cart.clone());
        Ok(cart)
    }

    async fn find_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> ShopResult<Option<CartItem>> {
        Ok(self
            .working
            .items
            .values()
            .find(|i| i.cart_id == cart_id && i.product_id == product_id)
            .cloned())
    }

    async fn insert_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> ShopResult<CartItem> {
        self.working.last_cart_item_id += 1;
        let item = CartItem {
            cart_item_id: CartItemId::from_db(self.working.last_cart_item_id),
            cart_id,
            product_id,
            quantity,
        };
        self.working.items.insert(item.cart_item_id, item.clone());
        Ok(item)
    }

    async fn update_item_quantity(
        &mut self,
        cart_item_id: CartItemId,
        quantity: Quantity,
    ) -> ShopResult<()> {
        let item = self
            .working
            .items
            .get_mut(&cart_item_id)
            .ok_or_else(|| ShopError::Internal(format!("cart item {} vanished", cart_item_id)))?;
        item.quantity = quantity;
        Ok(())
    }

    async fn commit(self) -> ShopResult<()> {
        let Self { mut guard, working } = self;
        *guard = working;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dropped_transaction_leaves_no_trace() {
        let store = InMemoryShopStore::new();
        store.insert_customer(1).await;
        let name = CartName::new("default").unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            tx.lock_or_create_cart(CustomerId::from_db(1), &name)
                .await
                .unwrap();
        }

        assert_eq!(store.cart_count().await, 0);
        assert!(
            store
                .find_cart(CustomerId::from_db(1), &name)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible() {
        let store = InMemoryShopStore::new();
        store.insert_customer(1).await;
        let name = CartName::new("default").unwrap();

        let mut tx = store.begin().await.unwrap();
        let cart = tx
            .lock_or_create_cart(CustomerId::from_db(1), &name)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let found = store.find_cart(CustomerId::from_db(1), &name).await.unwrap();
        assert_eq!(found, Some(cart));
    }
}
