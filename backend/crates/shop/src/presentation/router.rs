//! Shop Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::ShopConfig;
use crate::domain::repository::{CartQueryRepository, CartStore, ProductRepository};
use crate::infra::postgres::PgShopRepository;
use crate::presentation::handlers::{self, ShopAppState};

/// Create the Shop router with PostgreSQL repository
pub fn shop_router(repo: PgShopRepository, config: ShopConfig) -> Router {
    shop_router_generic(repo, config)
}

/// Create a generic Shop router for any repository implementation
pub fn shop_router_generic<R>(repo: R, config: ShopConfig) -> Router
where
    R: ProductRepository + CartQueryRepository + CartStore + Clone + Send + Sync + 'static,
{
    let state = ShopAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/cart/add", post(handlers::add_item::<R>))
        .route("/cart/view", post(handlers::view_cart::<R>))
        .route("/products/search", get(handlers::search_products::<R>))
        .with_state(state)
}
