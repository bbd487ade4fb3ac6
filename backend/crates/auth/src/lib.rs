//! Auth (Customer Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Customer entity, value objects, repository trait
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Login with email + password, returning the customer profile
//! - Password change with old-password confirmation
//! - Transparent migration of legacy plaintext passwords to Argon2id
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Unknown email and wrong password are indistinguishable to the client
//! - Password writes are compare-and-swap on the previously read value

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryCustomerRepository, postgres::PgCustomerRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
