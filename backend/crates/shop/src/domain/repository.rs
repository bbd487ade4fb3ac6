//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use std::future::Future;

use kernel::id::{CartId, CartItemId, CustomerId, ProductId};

use crate::domain::entities::{Cart, CartItem, CartLine, Product};
use crate::domain::value_objects::{CartName, ProductFilter, Quantity};
use crate::error::ShopResult;

/// Catalog repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// Products matching every criterion of the filter, ordered by id
    async fn search(&self, filter: &ProductFilter) -> ShopResult<Vec<Product>>;
}

/// Read-only cart access
#[trait_variant::make(CartQueryRepository: Send)]
pub trait LocalCartQueryRepository {
    async fn customer_exists(&self, customer_id: CustomerId) -> ShopResult<bool>;

    async fn find_cart(
        &self,
        customer_id: CustomerId,
        cart_name: &CartName,
    ) -> ShopResult<Option<Cart>>;

    /// Items of a cart with their products, ordered by item id
    async fn list_lines(&self, cart_id: CartId) -> ShopResult<Vec<CartLine>>;
}

/// Unit of work for cart writes
///
/// Nothing becomes visible to other requests until [`commit`](Self::commit);
/// dropping the transaction rolls it back.
pub trait CartTransaction: Send {
    fn customer_exists(
        &mut self,
        customer_id: CustomerId,
    ) -> impl Future<Output = ShopResult<bool>> + Send;

    fn find_product(
        &mut self,
        product_id: ProductId,
    ) -> impl Future<Output = ShopResult<Option<Product>>> + Send;

    /// Return the cart, creating it if needed, and hold its row lock until
    /// the transaction ends
    fn lock_or_create_cart(
        &mut self,
        customer_id: CustomerId,
        cart_name: &CartName,
    ) -> impl Future<Output = ShopResult<Cart>> + Send;

    fn find_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> impl Future<Output = ShopResult<Option<CartItem>>> + Send;

    fn insert_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> impl Future<Output = ShopResult<CartItem>> + Send;

    fn update_item_quantity(
        &mut self,
        cart_item_id: CartItemId,
        quantity: Quantity,
    ) -> impl Future<Output = ShopResult<()>> + Send;

    fn commit(self) -> impl Future<Output = ShopResult<()>> + Send
    where
        Self: Sized;
}

/// Source of cart transactions
pub trait CartStore: Send + Sync {
    type Tx: CartTransaction;

    fn begin(&self) -> impl Future<Output = ShopResult<Self::Tx>> + Send;
}
