//! HTTP Handlers

use axum::extract::State;
use kernel::extract::Json;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ChangePasswordInput, ChangePasswordUseCase, SignInInput, SignInUseCase,
};
use crate::domain::repository::CustomerRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    ChangePasswordRequest, CustomerProfileResponse, LoginRequest, MessageResponse,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: CustomerRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<CustomerProfileResponse>>
where
    R: CustomerRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let profile = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(profile.into()))
}

/// POST /api/auth/change-password
pub async fn change_password<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: CustomerRepository + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(ChangePasswordInput {
            email: req.email,
            old_password: req.old_password,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: "Password changed successfully".to_string(),
    }))
}
