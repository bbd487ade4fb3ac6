//! Application Layer
//!
//! Use cases and application services.

pub mod change_password;
pub mod config;
mod credential;
pub mod sign_in;

// Re-exports
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use sign_in::{CustomerProfile, SignInInput, SignInUseCase};
