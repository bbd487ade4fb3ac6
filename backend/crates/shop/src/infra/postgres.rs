//! PostgreSQL Repository Implementations

use kernel::id::{CartId, CartItemId, CustomerId, ProductId};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{Cart, CartItem, CartLine, Product};
use crate::domain::repository::{
    CartQueryRepository, CartStore, CartTransaction, ProductRepository,
};
use crate::domain::value_objects::{CartName, Price, ProductFilter, Quantity};
use crate::error::ShopResult;

/// PostgreSQL-backed shop repository
#[derive(Clone)]
pub struct PgShopRepository {
    pool: PgPool,
}

impl PgShopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Product Repository Implementation
// ============================================================================

impl ProductRepository for PgShopRepository {
    async fn search(&self, filter: &ProductFilter) -> ShopResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                product_name,
                price
            FROM products
            WHERE ($1::text IS NULL OR product_name ILIKE $1)
              AND ($2::numeric IS NULL OR price >= $2)
              AND ($3::numeric IS NULL OR price <= $3)
            ORDER BY product_id
            "#,
        )
        .bind(filter.name_pattern())
        .bind(filter.min_price())
        .bind(filter.max_price())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }
}

// ============================================================================
// Cart Query Repository Implementation
// ============================================================================

impl CartQueryRepository for PgShopRepository {
    async fn customer_exists(&self, customer_id: CustomerId) -> ShopResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE customer_id = $1)",
        )
        .bind(customer_id.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn find_cart(
        &self,
        customer_id: CustomerId,
        cart_name: &CartName,
    ) -> ShopResult<Option<Cart>> {
        let row = sqlx::query_as::<_, CartRow>(
            r#"
            SELECT
                cart_id,
                customer_id,
                cart_name
            FROM carts
            WHERE customer_id = $1 AND cart_name = $2
            "#,
        )
        .bind(customer_id.get())
        .bind(cart_name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CartRow::into_cart))
    }

    async fn list_lines(&self, cart_id: CartId) -> ShopResult<Vec<CartLine>> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            r#"
            SELECT
                ci.cart_item_id,
                ci.cart_id,
                ci.product_id,
                ci.quantity,
                p.product_name,
                p.price
            FROM cart_items ci
            LEFT JOIN products p ON p.product_id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.cart_item_id
            "#,
        )
        .bind(cart_id.get())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CartLineRow::into_line).collect())
    }
}

// ============================================================================
// Cart Transactions
// ============================================================================

impl CartStore for PgShopRepository {
    type Tx = PgCartTransaction;

    async fn begin(&self) -> ShopResult<Self::Tx> {
        let tx = self.pool.begin().await?;
        Ok(PgCartTransaction { tx })
    }
}

/// Open database transaction; rolled back by sqlx if dropped uncommitted
pub struct PgCartTransaction {
    tx: Transaction<'static, Postgres>,
}

impl CartTransaction for PgCartTransaction {
    async fn customer_exists(&mut self, customer_id: CustomerId) -> ShopResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE customer_id = $1)",
        )
        .bind(customer_id.get())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(exists)
    }

    async fn find_product(&mut self, product_id: ProductId) -> ShopResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT
                product_id,
                product_name,
                price
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.get())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn lock_or_create_cart(
        &mut self,
        customer_id: CustomerId,
        cart_name: &CartName,
    ) -> ShopResult<Cart> {
        let existing = sqlx::query_as::<_, CartRow>(
            r#"
            SELECT
                cart_id,
                customer_id,
                cart_name
            FROM carts
            WHERE customer_id = $1 AND cart_name = $2
            FOR UPDATE
            "#,
        )
        .bind(customer_id.get())
        .bind(cart_name.as_str())
        .fetch_optional(&mut *self.tx)
        .await?;

        if let Some(row) = existing {
            return Ok(row.into_cart());
        }

        // A concurrent request may create the same cart between the SELECT
        // and here. The no-op update makes the insert return (and lock) its row.
        let row = sqlx::query_as::<_, CartRow>(
            r#"
            INSERT INTO carts (customer_id, cart_name)
            VALUES ($1, $2)
            ON CONFLICT (customer_id, cart_name)
                DO UPDATE SET cart_name = EXCLUDED.cart_name
            RETURNING
                cart_id,
                customer_id,
                cart_name
            "#,
        )
        .bind(customer_id.get())
        .bind(cart_name.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.into_cart())
    }

    async fn find_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> ShopResult<Option<CartItem>> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT
                cart_item_id,
                cart_id,
                product_id,
                quantity
            FROM cart_items
            WHERE cart_id = $1 AND product_id = $2
            "#,
        )
        .bind(cart_id.get())
        .bind(product_id.get())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(CartItemRow::into_item))
    }

    async fn insert_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> ShopResult<CartItem> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r#"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING
                cart_item_id,
                cart_id,
                product_id,
                quantity
            "#,
        )
        .bind(cart_id.get())
        .bind(product_id.get())
        .bind(quantity.get())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row.into_item())
    }

    async fn update_item_quantity(
        &mut self,
        cart_item_id: CartItemId,
        quantity: Quantity,
    ) -> ShopResult<()> {
        sqlx::query(
            r#"
            UPDATE cart_items SET
                quantity = $2,
                updated_at = now()
            WHERE cart_item_id = $1
            "#,
        )
        .bind(cart_item_id.get())
        .bind(quantity.get())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn commit(self) -> ShopResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: i64,
    product_name: String,
    price: Decimal,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            product_id: ProductId::from_db(self.product_id),
            name: self.product_name,
            price: Price::from_db(self.price),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartRow {
    cart_id: i64,
    customer_id: i64,
    cart_name: String,
}

impl CartRow {
    fn into_cart(self) -> Cart {
        Cart {
            cart_id: CartId::from_db(self.cart_id),
            customer_id: CustomerId::from_db(self.customer_id),
            cart_name: CartName::from_db(self.cart_name),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartItemRow {
    cart_item_id: i64,
    cart_id: i64,
    product_id: i64,
    quantity: i32,
}

impl CartItemRow {
    fn into_item(self) -> CartItem {
        CartItem {
            cart_item_id: CartItemId::from_db(self.cart_item_id),
            cart_id: CartId::from_db(self.cart_id),
            product_id: ProductId::from_db(self.product_id),
            quantity: Quantity::from_db(self.quantity),
        }
    }
}

#[derive(sqlx::FromRow)]
struct CartLineRow {
    cart_item_id: i64,
    cart_id: i64,
    product_id: i64,
    quantity: i32,
    product_name: Option<String>,
    price: Option<Decimal>,
}

impl CartLineRow {
    fn into_line(self) -> CartLine {
        let product = match (self.product_name, self.price) {
            (Some(name), Some(price)) => Some(Product {
                product_id: ProductId::from_db(self.product_id),
                name,
                price: Price::from_db(price),
            }),
            _ => None,
        };

        CartLine {
            item: CartItem {
                cart_item_id: CartItemId::from_db(self.cart_item_id),
                cart_id: CartId::from_db(self.cart_id),
                product_id: ProductId::from_db(self.product_id),
                quantity: Quantity::from_db(self.quantity),
            },
            product,
        }
    }
}

/// Run with `DATABASE_URL` set: `cargo test -p shop -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::{AddItemInput, AddItemUseCase, ShopConfig};

    async fn seed_customer(pool: &PgPool) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO customers (first_name, last_name, email, password_hash)
            VALUES ('Somchai', 'Jaidee', 'somchai@example.com', 'unused')
            RETURNING customer_id
            "#,
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn seed_product(pool: &PgPool, name: &str, price: Decimal) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO products (product_name, price) VALUES ($1, $2) RETURNING product_id",
        )
        .bind(name)
        .bind(price)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "needs a PostgreSQL DATABASE_URL"]
    async fn test_concurrent_adds_share_one_cart_and_line(pool: PgPool) {
        let customer_id = seed_customer(&pool).await;
        let product_id = seed_product(&pool, "Pad Thai kit", Decimal::new(1999, 2)).await;
        let use_case = Arc::new(AddItemUseCase::new(
            Arc::new(PgShopRepository::new(pool.clone())),
            Arc::new(ShopConfig::default()),
        ));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let use_case = use_case.clone();
            handles.push(tokio::spawn(async move {
                use_case
                    .execute(AddItemInput {
                        customer_id,
                        product_id,
                        quantity: 1,
                        cart_name: "default".to_string(),
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let (carts, lines, quantity): (i64, i64, Option<i32>) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM carts),
                (SELECT COUNT(*) FROM cart_items),
                (SELECT MAX(quantity) FROM cart_items)
            "#,
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!((carts, lines, quantity), (1, 1, Some(5)));
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "needs a PostgreSQL DATABASE_URL"]
    async fn test_unknown_product_rolls_back_cart(pool: PgPool) {
        let customer_id = seed_customer(&pool).await;
        let use_case = AddItemUseCase::new(
            Arc::new(PgShopRepository::new(pool.clone())),
            Arc::new(ShopConfig::default()),
        );

        let err = use_case
            .execute(AddItemInput {
                customer_id,
                product_id: 999,
                quantity: 1,
                cart_name: "default".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);

        let carts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM carts")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(carts, 0);
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "needs a PostgreSQL DATABASE_URL"]
    async fn test_search_treats_wildcards_literally(pool: PgPool) {
        let discounted = seed_product(&pool, "Mug 50% off", Decimal::new(500, 2)).await;
        seed_product(&pool, "Mug 500ml", Decimal::new(700, 2)).await;
        let underscored = seed_product(&pool, "tea_pot", Decimal::new(1200, 2)).await;
        seed_product(&pool, "teaXpot", Decimal::new(1200, 2)).await;
        let repo = PgShopRepository::new(pool);

        let filter = ProductFilter::new(Some("50%".to_string()), None, None).unwrap();
        let found = repo.search(&filter).await.unwrap();
        assert_eq!(
            found.iter().map(|p| p.product_id.get()).collect::<Vec<_>>(),
            vec![discounted]
        );

        let filter = ProductFilter::new(Some("A_P".to_string()), None, None).unwrap();
        let found = repo.search(&filter).await.unwrap();
        assert_eq!(
            found.iter().map(|p| p.product_id.get()).collect::<Vec<_>>(),
            vec![underscored]
        );
    }

    #[sqlx::test(migrations = "../../../database/migrations")]
    #[ignore = "needs a PostgreSQL DATABASE_URL"]
    async fn test_search_price_bounds_are_inclusive(pool: PgPool) {
        let free = seed_product(&pool, "Sticker", Decimal::ZERO).await;
        let mug = seed_product(&pool, "Mug", Decimal::new(500, 2)).await;
        seed_product(&pool, "Teapot", Decimal::new(1200, 2)).await;
        let repo = PgShopRepository::new(pool);

        let filter =
            ProductFilter::new(None, Some(Decimal::ZERO), Some(Decimal::new(5, 0))).unwrap();
        let found = repo.search(&filter).await.unwrap();

        assert_eq!(
            found.iter().map(|p| p.product_id.get()).collect::<Vec<_>>(),
            vec![free, mug]
        );
    }
}
