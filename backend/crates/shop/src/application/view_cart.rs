//! View Cart Use Case

use std::sync::Arc;

use kernel::id::{CustomerId, ProductId};
use rust_decimal::Decimal;

use crate::domain::repository::CartQueryRepository;
use crate::domain::value_objects::CartName;
use crate::error::{ShopError, ShopResult};

/// View cart input
pub struct ViewCartInput {
    pub customer_id: i64,
    pub cart_name: String,
}

/// Cart contents as shown to the customer
#[derive(Debug, Clone)]
pub struct CartView {
    pub cart_name: String,
    pub products: Vec<CartProduct>,
}

/// Product line of a cart view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartProduct {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
}

/// View cart use case
pub struct ViewCartUseCase<R>
where
    R: CartQueryRepository,
{
    repo: Arc<R>,
}

impl<R> ViewCartUseCase<R>
where
    R: CartQueryRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: ViewCartInput) -> ShopResult<CartView> {
        let customer_id = CustomerId::new(input.customer_id)?;
        let cart_name = CartName::new(&input.cart_name)?;

        if !self.repo.customer_exists(customer_id).await? {
            return Err(ShopError::CustomerNotFound);
        }

        let cart = self
            .repo
            .find_cart(customer_id, &cart_name)
            .await?
            .ok_or(ShopError::CartNotFound)?;

        let lines = self.repo.list_lines(cart.cart_id).await?;

        let products = lines
            .into_iter()
            .filter_map(|line| match line.product {
                Some(product) => Some(CartProduct {
                    product_id: product.product_id,
                    name: product.name,
                    price: product.price.amount(),
                    quantity: line.item.quantity.get(),
                }),
                None => {
                    tracing::warn!(
                        cart_id = %cart.cart_id,
                        cart_item_id = %line.item.cart_item_id,
                        product_id = %line.item.product_id,
                        "Cart item references a missing product, skipped"
                    );
                    None
                }
            })
            .collect();

        Ok(CartView {
            cart_name: cart.cart_name.as_str().to_string(),
            products,
        })
    }
}
