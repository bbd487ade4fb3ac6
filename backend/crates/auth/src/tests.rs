//! Unit tests for the auth crate
//! Error mapping and the HTTP surface end to end

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::app_error::AppError;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::CustomerNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidOldPassword, StatusCode::UNAUTHORIZED),
            (
                AuthError::Rejected(AppError::bad_request("Invalid email format")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AuthError::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AuthError::Internal("test".into()),
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
    fn test_server_errors_hide_details() {
        let err = AuthError::Internal("argon2 exploded".into());
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }

    #[test]
    fn test_rejected_keeps_client_message() {
        let err: AuthError = AppError::bad_request("Email cannot be empty").into();
        assert_eq!(err.to_string(), "Email cannot be empty");
        assert_eq!(err.to_app_error().message(), "Email cannot be empty");
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::domain::value_object::customer_password::{LegacyPassword, StoredPassword};
    use crate::infra::memory::{InMemoryCustomerRepository, sample_customer};
    use crate::presentation::router::auth_router_generic;

    async fn app() -> Router {
        let repo = InMemoryCustomerRepository::new();
        let hash = LegacyPassword::new("p").hash(None).unwrap();
        repo.insert(sample_customer(1, "a@x.com", StoredPassword::Argon2id(hash)))
            .await;
        repo.insert(sample_customer(
            2,
            "legacy@x.com",
            StoredPassword::Legacy(LegacyPassword::new("old-secret")),
        ))
        .await;
        auth_router_generic(repo, AuthConfig::default())
    }

    async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_login_returns_profile_without_password() {
        let app = app().await;

        let (status, body) = post(&app, "/login", json!({"email": "a@x.com", "password": "p"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["customer_id"], 1);
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["first_name"], "Somchai");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_login_failures_are_byte_identical() {
        let app = app().await;

        let wrong = post(&app, "/login", json!({"email": "a@x.com", "password": "q"})).await;
        let unknown = post(&app, "/login", json!({"email": "z@x.com", "password": "p"})).await;

        assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong, unknown);
    }

    #[tokio::test]
    async fn test_login_missing_field_is_bad_request() {
        let app = app().await;

        let (status, body) = post(&app, "/login", json!({"email": "a@x.com"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_change_password_flow() {
        let app = app().await;
        let new_password = "Tamarind#Mango42";

        let (status, body) = post(
            &app,
            "/change-password",
            json!({
                "email": "legacy@x.com",
                "old_password": "old-secret",
                "new_password": new_password,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, _) = post(&app, "/login", json!({"email": "legacy@x.com", "password": "old-secret"})).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = post(&app, "/login", json!({"email": "legacy@x.com", "password": new_password})).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_change_password_wrong_old_password() {
        let app = app().await;

        let (status, _) = post(
            &app,
            "/change-password",
            json!({
                "email": "a@x.com",
                "old_password": "wrong",
                "new_password": "Tamarind#Mango42",
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
