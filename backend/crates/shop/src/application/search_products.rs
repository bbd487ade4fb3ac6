//! Search Products Use Case

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::entities::Product;
use crate::domain::repository::ProductRepository;
use crate::domain::value_objects::ProductFilter;
use crate::error::ShopResult;

/// Search input; every criterion is optional
#[derive(Debug, Clone, Default)]
pub struct SearchProductsInput {
    pub name: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Search products use case
pub struct SearchProductsUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
}

impl<R> SearchProductsUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// An empty result is `Ok(vec![])`, not an error
    pub async fn execute(&self, input: SearchProductsInput) -> ShopResult<Vec<Product>> {
        let filter = ProductFilter::new(input.name, input.min_price, input.max_price)?;

        if filter.is_unsatisfiable() {
            tracing::debug!(?filter, "Price range is empty, skipping query");
            return Ok(Vec::new());
        }

        self.repo.search(&filter).await
    }
}
