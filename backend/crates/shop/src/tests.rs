//! Unit tests for the shop crate
//! Error mapping and the HTTP surface end to end

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::app_error::AppError;
    use kernel::id::CustomerId;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(ShopError, StatusCode)> = vec![
            (ShopError::CustomerNotFound, StatusCode::UNAUTHORIZED),
            (ShopError::ProductNotFound, StatusCode::NOT_FOUND),
            (ShopError::CartNotFound, StatusCode::NOT_FOUND),
            (
                ShopError::InvalidQuantity("quantity must be at least 1".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ShopError::Rejected(AppError::bad_request("Cart name cannot be empty")),
                StatusCode::BAD_REQUEST,
            ),
            (
                ShopError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ShopError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_invalid_id_is_bad_request() {
        let err: ShopError = CustomerId::new(-1).unwrap_err().into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("customer_id"));
    }

    #[test]
    fn test_database_error_hides_details() {
        let err = ShopError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }

    #[test]
    fn test_every_database_failure_is_internal() {
        let failures = [
            sqlx::Error::RowNotFound,
            sqlx::Error::PoolTimedOut,
            sqlx::Error::PoolClosed,
            sqlx::Error::Io(std::io::Error::other("connection reset")),
        ];

        for failure in failures {
            let app_error = ShopError::Database(failure).to_app_error();
            assert_eq!(app_error.status_code(), 500);
            assert_eq!(app_error.message(), "Internal server error");
        }
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::ShopConfig;
    use crate::infra::memory::InMemoryShopStore;
    use crate::presentation::router::shop_router_generic;

    async fn app() -> Router {
        let store = InMemoryShopStore::new();
        store.insert_customer(1).await;
        store.insert_product(5, "Pad Thai kit", Decimal::new(1999, 2)).await;
        store.insert_product(6, "Fish sauce", Decimal::new(350, 2)).await;
        shop_router_generic(store, ShopConfig::default())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_add_then_view_accumulates() {
        let app = app().await;

        for quantity in [2, 3] {
            let (status, body) = post(
                &app,
                "/cart/add",
                json!({"customer_id": 1, "product_id": 5, "quantity": quantity, "cart_name": "default"}),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert!(body["message"].is_string());
        }

        let (status, body) = post(
            &app,
            "/cart/view",
            json!({"customer_id": 1, "cart_name": "default"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cart_name"], "default");
        assert_eq!(
            body["products"],
            json!([{"product_id": 5, "name": "Pad Thai kit", "price": 19.99, "quantity": 5}])
        );
    }

    #[tokio::test]
    async fn test_add_error_statuses() {
        let app = app().await;

        let cases = [
            (json!({"customer_id": 9, "product_id": 5, "quantity": 1, "cart_name": "default"}), StatusCode::UNAUTHORIZED),
            (json!({"customer_id": 1, "product_id": 9, "quantity": 1, "cart_name": "default"}), StatusCode::NOT_FOUND),
            (json!({"customer_id": 1, "product_id": 5, "quantity": 0, "cart_name": "default"}), StatusCode::BAD_REQUEST),
            (json!({"customer_id": 1, "product_id": 5, "cart_name": "default"}), StatusCode::BAD_REQUEST),
            (json!({"customer_id": "one", "product_id": 5, "quantity": 1, "cart_name": "default"}), StatusCode::BAD_REQUEST),
        ];

        for (body, expected) in cases {
            let (status, problem) = post(&app, "/cart/add", body.clone()).await;
            assert_eq!(status, expected, "{body}");
            assert_eq!(problem["status"], expected.as_u16());
        }
    }

    #[tokio::test]
    async fn test_view_unknown_cart_is_not_found() {
        let app = app().await;

        let (status, _) = post(
            &app,
            "/cart/view",
            json!({"customer_id": 1, "cart_name": "never-created"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = post(
            &app,
            "/cart/view",
            json!({"customer_id": 9, "cart_name": "default"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_search_returns_products() {
        let app = app().await;

        let (status, body) = get(&app, "/products/search?name=thai").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{"product_id": 5, "name": "Pad Thai kit", "price": 19.99}])
        );
    }

    #[tokio::test]
    async fn test_search_empty_params_mean_no_filter() {
        let app = app().await;

        let (status, body) = get(&app, "/products/search?name=&min_price=&max_price=").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_search_without_match_is_not_found() {
        let app = app().await;

        let (status, body) = get(&app, "/products/search?min_price=100&max_price=10").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"message": "No products found matching the search criteria"})
        );
    }

    #[tokio::test]
    async fn test_search_bad_params() {
        let app = app().await;

        let (status, _) = get(&app, "/products/search?min_price=cheap").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get(&app, "/products/search?max_price=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
