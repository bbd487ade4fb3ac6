//! HTTP Handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::extract::{Json, Query};
use std::sync::Arc;

use crate::application::config::ShopConfig;
use crate::application::{
    AddItemInput, AddItemUseCase, SearchProductsInput, SearchProductsUseCase, ViewCartInput,
    ViewCartUseCase,
};
use crate::domain::repository::{CartQueryRepository, CartStore, ProductRepository};
use crate::error::ShopResult;
use crate::presentation::dto::{
    AddItemRequest, CartViewResponse, MessageResponse, ProductResponse, SearchProductsQuery,
    ViewCartRequest,
};

/// Shared state for shop handlers
#[derive(Clone)]
pub struct ShopAppState<R>
where
    R: ProductRepository + CartQueryRepository + CartStore + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<ShopConfig>,
}

// ============================================================================
// Cart
// ============================================================================

/// POST /api/cart/add
pub async fn add_item<R>(
    State(state): State<ShopAppState<R>>,
    Json(req): Json<AddItemRequest>,
) -> ShopResult<Json<MessageResponse>>
where
    R: ProductRepository + CartQueryRepository + CartStore + Clone + Send + Sync + 'static,
{
    let use_case = AddItemUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(AddItemInput {
            customer_id: req.customer_id,
            product_id: req.product_id,
            quantity: req.quantity,
            cart_name: req.cart_name,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Item added to cart".to_string(),
    }))
}

/// POST /api/cart/view
pub async fn view_cart<R>(
    State(state): State<ShopAppState<R>>,
    Json(req): Json<ViewCartRequest>,
) -> ShopResult<Json<CartViewResponse>>
where
    R: ProductRepository + CartQueryRepository + CartStore + Clone + Send + Sync + 'static,
{
    let use_case = ViewCartUseCase::new(state.repo.clone());

    let view = use_case
        .execute(ViewCartInput {
            customer_id: req.customer_id,
            cart_name: req.cart_name,
        })
        .await?;

    Ok(Json(view.into()))
}

// ============================================================================
// Catalog
// ============================================================================

/// GET /api/products/search
///
/// No match is reported as 404 with a message body.
pub async fn search_products<R>(
    State(state): State<ShopAppState<R>>,
    Query(query): Query<SearchProductsQuery>,
) -> ShopResult<Response>
where
    R: ProductRepository + CartQueryRepository + CartStore + Clone + Send + Sync + 'static,
{
    let use_case = SearchProductsUseCase::new(state.repo.clone());

    let products = use_case
        .execute(SearchProductsInput {
            name: query.name,
            min_price: query.min_price,
            max_price: query.max_price,
        })
        .await?;

    if products.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(MessageResponse {
                message: "No products found matching the search criteria".to_string(),
            }),
        )
            .into_response());
    }

    let body: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(Json(body).into_response())
}
