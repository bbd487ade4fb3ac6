//! In-memory customer repository
//!
//! Same contract as [`PgCustomerRepository`](super::postgres::PgCustomerRepository),
//! including the compare-and-swap semantics of `replace_password`.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::id::CustomerId;
use platform::password::HashedPassword;
use tokio::sync::RwLock;

use crate::domain::entity::customer::Customer;
use crate::domain::repository::CustomerRepository;
use crate::domain::value_object::{customer_password::StoredPassword, email::Email};
use crate::error::AuthResult;

#[derive(Clone, Default)]
pub struct InMemoryCustomerRepository {
    customers: Arc<RwLock<HashMap<CustomerId, Customer>>>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a customer
    pub async fn insert(&self, customer: Customer) {
        self.customers
            .write()
            .await
            .insert(customer.customer_id, customer);
    }

    pub async fn get(&self, customer_id: CustomerId) -> Option<Customer> {
        self.customers.read().await.get(&customer_id).cloned()
    }
}

impl CustomerRepository for InMemoryCustomerRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.values().find(|c| &c.email == email).cloned())
    }

    async fn replace_password(
        &self,
        customer_id: CustomerId,
        current: &StoredPassword,
        new: &HashedPassword,
    ) -> AuthResult<bool> {
        let mut customers = self.customers.write().await;
        match customers.get_mut(&customer_id) {
            Some(customer) if &customer.password == current => {
                customer.password = StoredPassword::Argon2id(new.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Customer with fixed contact details for tests
#[cfg(test)]
pub(crate) fn sample_customer(id: i64, email: &str, password: StoredPassword) -> Customer {
    Customer {
        customer_id: CustomerId::from_db(id),
        first_name: "Somchai".to_string(),
        last_name: "Jaidee".to_string(),
        email: Email::new(email).unwrap(),
        phone_number: "0812345678".to_string(),
        address: "99 Sukhumvit Rd, Bangkok".to_string(),
        password,
    }
}
