//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::CustomerId;
use platform::password::HashedPassword;

use crate::domain::entity::customer::Customer;
use crate::domain::value_object::{customer_password::StoredPassword, email::Email};
use crate::error::AuthResult;

/// Customer credential store
#[trait_variant::make(CustomerRepository: Send)]
pub trait LocalCustomerRepository {
    /// Find a customer by (lowercased) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Customer>>;

    /// Replace the stored password if it still equals `current`
    ///
    /// Returns `false` when the row changed since it was read (or is gone),
    /// so concurrent migrations and password changes cannot overwrite each
    /// other.
    async fn replace_password(
        &self,
        customer_id: CustomerId,
        current: &StoredPassword,
        new: &HashedPassword,
    ) -> AuthResult<bool>;
}
