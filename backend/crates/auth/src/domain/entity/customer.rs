//! Customer Entity

use kernel::id::CustomerId;

use crate::domain::value_object::{customer_password::StoredPassword, email::Email};

/// Customer account
///
/// Contact fields are free text; only the email takes part in login.
#[derive(Debug, Clone)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    /// Unique login key
    pub email: Email,
    pub phone_number: String,
    pub address: String,
    pub password: StoredPassword,
}
