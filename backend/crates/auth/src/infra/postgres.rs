//! PostgreSQL Repository Implementations

use kernel::id::CustomerId;
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::customer::Customer;
use crate::domain::repository::CustomerRepository;
use crate::domain::value_object::{customer_password::StoredPassword, email::Email};
use crate::error::AuthResult;

/// PostgreSQL-backed customer repository
#[derive(Clone)]
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CustomerRepository for PgCustomerRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Customer>> {
        // Rows imported from the legacy schema may carry mixed-case emails.
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                customer_id,
                first_name,
                last_name,
                email,
                phone_number,
                address,
                password_hash,
                password_scheme
            FROM customers
            WHERE lower(email) = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_customer()).transpose()
    }

    async fn replace_password(
        &self,
        customer_id: CustomerId,
        current: &StoredPassword,
        new: &HashedPassword,
    ) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE customers SET
                password_hash = $4,
                password_scheme = $5,
                updated_at = now()
            WHERE customer_id = $1
              AND password_scheme = $2
              AND password_hash = $3
            "#,
        )
        .bind(customer_id.get())
        .bind(current.scheme())
        .bind(current.as_db_str())
        .bind(new.as_phc_string())
        .bind(StoredPassword::ARGON2ID_SCHEME)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated == 1)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct CustomerRow {
    customer_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    address: String,
    password_hash: String,
    password_scheme: i16,
}

impl CustomerRow {
    fn into_customer(self) -> AuthResult<Customer> {
        let password = StoredPassword::from_db(self.password_scheme, self.password_hash)?;

        Ok(Customer {
            customer_id: CustomerId::from_db(self.customer_id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: Email::from_db(self.email.to_lowercase()),
            phone_number: self.phone_number,
            address: self.address,
            password,
        })
    }
}
