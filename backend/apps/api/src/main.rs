//! API Server Entry Point
//!
//! Loads configuration, connects to the database and serves the
//! storefront API. Uses `anyhow` for startup errors; request errors
//! go through `kernel::error::AppError`.

mod config;

use auth::{AuthConfig, PgCustomerRepository, auth_router};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use shop::{PgShopRepository, ShopConfig, shop_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "storefront_api=info,auth=info,shop=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(config.database_url.expose_secret())
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = match &config.password_pepper {
        Some(pepper) => AuthConfig::with_pepper(pepper.expose_secret().to_vec()),
        None => {
            tracing::warn!("PASSWORD_PEPPER not set, hashing passwords without a pepper");
            AuthConfig::default()
        }
    };
    let shop_config = ShopConfig {
        max_quantity_per_add: config.max_quantity_per_add,
    };

    let app = api_router(
        auth_router(PgCustomerRepository::new(pool.clone()), auth_config),
        shop_router(PgShopRepository::new(pool), shop_config),
    )
    .layer(TraceLayer::new_for_http())
    .layer(cors_layer(&config.frontend_origins));

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Mount the feature routers under `/api`
fn api_router(auth: Router, shop: Router) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .nest("/auth", auth)
        .merge(shop);

    Router::new().nest("/api", api)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::{InMemoryCustomerRepository, auth_router_generic};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use shop::{InMemoryShopStore, shop_router_generic};
    use tower::ServiceExt;

    fn app() -> Router {
        api_router(
            auth_router_generic(InMemoryCustomerRepository::new(), AuthConfig::default()),
            shop_router_generic(InMemoryShopStore::new(), ShopConfig::default()),
        )
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_auth_routes_are_nested() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"email": "nobody@example.com", "password": "whatever"}).to_string(),
            ))
            .unwrap();

        let (status, _) = send(request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_shop_routes_are_mounted() {
        let request = Request::builder()
            .uri("/api/products/search")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"message": "No products found matching the search criteria"})
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let request = Request::builder()
            .uri("/login")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
