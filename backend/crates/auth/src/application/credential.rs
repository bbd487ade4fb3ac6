//! Legacy credential migration shared by login and password change.

use std::sync::LazyLock;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::domain::entity::customer::Customer;
use crate::domain::repository::CustomerRepository;
use crate::domain::value_object::customer_password::{RawPassword, StoredPassword};
use crate::error::{AuthError, AuthResult};

/// Compare-and-swap attempts before giving up on a row that keeps changing
const MAX_MIGRATION_ATTEMPTS: usize = 3;

/// Hash with the current parameters that no customer owns
static DECOY_HASH: LazyLock<Option<HashedPassword>> = LazyLock::new(|| {
    ClearTextPassword::for_verification("decoy-credential".to_string())
        .hash(None)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to build decoy password hash"))
        .ok()
});

/// Spend one full verification when no customer matched, so an unknown
/// email answers in the same time as a wrong password
pub(crate) fn verify_against_decoy(password: &RawPassword, pepper: Option<&[u8]>) {
    if let Some(decoy) = DECOY_HASH.as_ref() {
        let _ = decoy.verify(password.inner(), pepper);
    }
}

/// Make sure the customer's stored password is an Argon2id hash
///
/// A legacy plaintext value is hashed and written back before anything is
/// verified against it. When the write loses a race the row is reloaded,
/// since another request has migrated or replaced it in the meantime.
/// `on_missing` is returned if the row disappears while reloading.
pub(crate) async fn ensure_hashed<R: CustomerRepository>(
    repo: &R,
    mut customer: Customer,
    pepper: Option<&[u8]>,
    on_missing: fn() -> AuthError,
) -> AuthResult<(Customer, HashedPassword)> {
    for _ in 0..MAX_MIGRATION_ATTEMPTS {
        let legacy = match &customer.password {
            StoredPassword::Argon2id(hash) => {
                let hash = hash.clone();
                return Ok((customer, hash));
            }
            StoredPassword::Legacy(legacy) => legacy,
        };

        let hashed = legacy.hash(pepper)?;

        if repo
            .replace_password(customer.customer_id, &customer.password, &hashed)
            .await?
        {
            tracing::info!(
                customer_id = %customer.customer_id,
                "Migrated legacy password to argon2id"
            );
            customer.password = StoredPassword::Argon2id(hashed.clone());
            return Ok((customer, hashed));
        }

        customer = repo
            .find_by_email(&customer.email)
            .await?
            .ok_or_else(on_missing)?;
    }

    Err(AuthError::Internal(
        "Password migration kept losing concurrent updates".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{InMemoryCustomerRepository, sample_customer};
    use crate::domain::value_object::customer_password::LegacyPassword;

    #[test]
    fn test_decoy_hash_matches_current_parameters() {
        let decoy = DECOY_HASH.as_ref().expect("decoy hash");
        assert!(!decoy.needs_rehash());

        let password = RawPassword::new("decoy-credential".to_string()).unwrap();
        assert!(!decoy.verify(password.inner(), Some(b"pepper")));
    }

    #[tokio::test]
    async fn test_legacy_row_is_migrated_once() {
        let repo = InMemoryCustomerRepository::new();
        let customer = sample_customer(1, "a@x.com", StoredPassword::Legacy(LegacyPassword::new("p")));
        repo.insert(customer.clone()).await;

        let (migrated, hash) = ensure_hashed(&repo, customer, None, || AuthError::InvalidCredentials)
            .await
            .unwrap();

        assert!(!migrated.password.is_legacy());
        let stored = repo.get(migrated.customer_id).await.unwrap();
        assert_eq!(stored.password, StoredPassword::Argon2id(hash));
    }

    #[tokio::test]
    async fn test_lost_race_reloads_the_winner() {
        let repo = InMemoryCustomerRepository::new();
        let stale = sample_customer(1, "a@x.com", StoredPassword::Legacy(LegacyPassword::new("p")));
        repo.insert(stale.clone()).await;

        // Another request migrated the row after `stale` was read.
        let winner = LegacyPassword::new("p").hash(None).unwrap();
        let mut current = stale.clone();
        current.password = StoredPassword::Argon2id(winner.clone());
        repo.insert(current).await;

        let (_, hash) = ensure_hashed(&repo, stale, None, || AuthError::InvalidCredentials)
            .await
            .unwrap();
        assert_eq!(hash, winner);
    }

    #[tokio::test]
    async fn test_row_deleted_during_migration() {
        let repo = InMemoryCustomerRepository::new();
        let stale = sample_customer(1, "a@x.com", StoredPassword::Legacy(LegacyPassword::new("p")));

        let err = ensure_hashed(&repo, stale, None, || AuthError::CustomerNotFound)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::CustomerNotFound));
    }
}
