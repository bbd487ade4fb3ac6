//! Shop Error Types
//!
//! Cart and catalog error variants that render through the unified
//! `kernel::error::AppError` problem response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::IdError;
use thiserror::Error;

/// Shop-specific result type alias
pub type ShopResult<T> = Result<T, ShopError>;

/// Shop-specific error variants
#[derive(Debug, Error)]
pub enum ShopError {
    /// No customer with the given id
    #[error("Customer not found")]
    CustomerNotFound,

    #[error("Product not found")]
    ProductNotFound,

    /// No cart with the given name for this customer
    #[error("Cart not found")]
    CartNotFound,

    /// Quantity out of range, or the accumulated total would overflow
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Input rejected before reaching the store
    #[error("{}", .0.message())]
    Rejected(#[from] AppError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::CustomerNotFound => ErrorKind::Unauthorized,
            ShopError::ProductNotFound | ShopError::CartNotFound => ErrorKind::NotFound,
            ShopError::InvalidQuantity(_) => ErrorKind::BadRequest,
            ShopError::Rejected(err) => err.kind(),
            ShopError::Database(_) | ShopError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures keep their details in the logs only.
    pub fn to_app_error(&self) -> AppError {
        match self {
            ShopError::Database(_) | ShopError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            ShopError::CartNotFound => AppError::not_found("Cart not found")
                .with_action("Add an item to create the cart"),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            ShopError::Database(e) => {
                tracing::error!(error = %e, "Shop database error");
            }
            ShopError::Internal(msg) => {
                tracing::error!(message = %msg, "Shop internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Shop error");
            }
        }
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        self.log();
        match self {
            ShopError::Rejected(err) => err.into_response(),
            other => other.to_app_error().into_response(),
        }
    }
}

impl From<IdError> for ShopError {
    fn from(err: IdError) -> Self {
        ShopError::Rejected(err.into())
    }
}
