//! Change Password Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::credential::ensure_hashed;
use crate::domain::repository::CustomerRepository;
use crate::domain::value_object::{
    customer_password::{NewPassword, RawPassword},
    email::Email,
};
use crate::error::{AuthError, AuthResult};

/// Change password input
pub struct ChangePasswordInput {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
}

/// Change password use case
pub struct ChangePasswordUseCase<R>
where
    R: CustomerRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> ChangePasswordUseCase<R>
where
    R: CustomerRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: ChangePasswordInput) -> AuthResult<()> {
        // Validate everything the client sent before touching the store
        let email = Email::new(&input.email)?;
        let old_password = RawPassword::new(input.old_password)?;
        let new_password = NewPassword::new(input.new_password)?;
        let pepper = self.config.pepper();

        let customer = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::CustomerNotFound)?;

        let (customer, hash) =
            ensure_hashed(self.repo.as_ref(), customer, pepper, || AuthError::CustomerNotFound)
                .await?;

        if !hash.verify(old_password.inner(), pepper) {
            return Err(AuthError::InvalidOldPassword);
        }

        let new_hash = new_password.hash(pepper)?;

        // Someone else changed the password after we verified the old one.
        if !self
            .repo
            .replace_password(customer.customer_id, &customer.password, &new_hash)
            .await?
        {
            return Err(AuthError::InvalidOldPassword);
        }

        tracing::info!(customer_id = %customer.customer_id, "Customer changed password");

        Ok(())
    }
}
