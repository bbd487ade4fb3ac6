//! Sign In Use Case
//!
//! Authenticates a customer by email and password and returns the profile.

use std::sync::Arc;

use kernel::id::CustomerId;

use crate::application::config::AuthConfig;
use crate::application::credential::{ensure_hashed, verify_against_decoy};
use crate::domain::entity::customer::Customer;
use crate::domain::repository::CustomerRepository;
use crate::domain::value_object::{customer_password::RawPassword, email::Email};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Public customer profile (never carries the password)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

impl From<Customer> for CustomerProfile {
    fn from(customer: Customer) -> Self {
        Self {
            customer_id: customer.customer_id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email.as_str().to_string(),
            phone_number: customer.phone_number,
            address: customer.address,
        }
    }
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: CustomerRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> SignInUseCase<R>
where
    R: CustomerRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<CustomerProfile> {
        let email = Email::new(&input.email)?;
        let password = RawPassword::new(input.password)?;
        let pepper = self.config.pepper();

        let Some(customer) = self.repo.find_by_email(&email).await? else {
            verify_against_decoy(&password, pepper);
            return Err(AuthError::InvalidCredentials);
        };

        let (customer, hash) =
            ensure_hashed(self.repo.as_ref(), customer, pepper, || AuthError::InvalidCredentials)
                .await?;

        if !hash.verify(password.inner(), pepper) {
            return Err(AuthError::InvalidCredentials);
        }

        if hash.needs_rehash() {
            self.upgrade_hash(&customer, &password).await;
        }

        tracing::info!(customer_id = %customer.customer_id, "Customer signed in");

        Ok(CustomerProfile::from(customer))
    }

    /// Re-hash with current parameters. Failure does not fail the login.
    async fn upgrade_hash(&self, customer: &Customer, password: &RawPassword) {
        let upgraded = match password.inner().hash(self.config.pepper()) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(customer_id = %customer.customer_id, error = %e, "Password rehash failed");
                return;
            }
        };

        match self
            .repo
            .replace_password(customer.customer_id, &customer.password, &upgraded)
            .await
        {
            Ok(true) => {
                tracing::info!(customer_id = %customer.customer_id, "Upgraded password hash parameters");
            }
            Ok(false) => {
                tracing::debug!(customer_id = %customer.customer_id, "Password changed before rehash, skipped");
            }
            Err(e) => {
                tracing::warn!(customer_id = %customer.customer_id, error = %e, "Failed to store rehashed password");
            }
        }
    }
}
