//! Customer Password Value Objects
//!
//! Delegates the cryptography to `platform::password` and adds the
//! customer-facing error messages.
//!
//! - [`RawPassword`] - a password typed at login (no policy, only non-empty)
//! - [`NewPassword`] - a password about to be stored (policy enforced)
//! - [`StoredPassword`] - what the `customers` row holds, tagged by scheme

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (login input)
// ============================================================================

/// Password supplied by a client that claims to know it
///
/// Passwords created before the policy existed must still work, so only
/// emptiness is rejected here.
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> AppResult<Self> {
        if raw.is_empty() {
            return Err(AppError::bad_request("Password cannot be empty")
                .with_action("Please enter a password"));
        }
        Ok(Self(ClearTextPassword::for_verification(raw)))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// New Password (policy checked)
// ============================================================================

/// Password chosen by the customer, validated against NIST SP 800-63B
pub struct NewPassword(ClearTextPassword);

impl NewPassword {
    /// ## Validation Rules
    /// - 8 to 128 characters after NFKC normalization
    /// - No control characters
    /// - No common patterns (sequential, keyboard, dictionary)
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(policy_error)?;
        Ok(Self(clear_text))
    }

    /// Hash for storage
    pub fn hash(&self, pepper: Option<&[u8]>) -> AuthResult<HashedPassword> {
        Ok(self.0.hash(pepper)?)
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NewPassword").field(&"[REDACTED]").finish()
    }
}

fn policy_error(err: PasswordPolicyError) -> AppError {
    match err {
        PasswordPolicyError::TooShort { min, actual } => AppError::bad_request(format!(
            "New password must be at least {} characters (got {})",
            min, actual
        ))
        .with_action("Please choose a longer password"),

        PasswordPolicyError::TooLong { max, actual } => AppError::bad_request(format!(
            "New password must be at most {} characters (got {})",
            max, actual
        ))
        .with_action("Please choose a shorter password"),

        PasswordPolicyError::EmptyOrWhitespace => {
            AppError::bad_request("New password cannot be empty")
                .with_action("Please enter a password")
        }

        PasswordPolicyError::InvalidCharacter => {
            AppError::bad_request("New password contains invalid characters")
                .with_action("Please remove any special control characters")
        }

        PasswordPolicyError::CommonPattern => {
            AppError::bad_request("New password is too common or follows a predictable pattern")
                .with_action("Please choose a more unique password")
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

// ============================================================================
// Stored Password
// ============================================================================

/// Plaintext left behind by the legacy schema
///
/// Only ever read so it can be hashed and replaced.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct LegacyPassword(String);

impl LegacyPassword {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Hash the stored plaintext with Argon2id
    pub fn hash(&self, pepper: Option<&[u8]>) -> AuthResult<HashedPassword> {
        let clear_text = ClearTextPassword::for_verification(self.0.clone());
        Ok(clear_text.hash(pepper)?)
    }
}

impl fmt::Debug for LegacyPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LegacyPassword").field(&"[REDACTED]").finish()
    }
}

/// Password column of a customer row
///
/// The `password_scheme` column decides the variant; the value itself is
/// never inspected to guess whether it is a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredPassword {
    /// `password_scheme = 0`
    Legacy(LegacyPassword),
    /// `password_scheme = 1`, PHC string
    Argon2id(HashedPassword),
}

impl StoredPassword {
    pub const LEGACY_SCHEME: i16 = 0;
    pub const ARGON2ID_SCHEME: i16 = 1;

    /// Rebuild from the `(password_scheme, password_hash)` column pair
    pub fn from_db(scheme: i16, value: String) -> AuthResult<Self> {
        match scheme {
            Self::LEGACY_SCHEME => Ok(Self::Legacy(LegacyPassword::new(value))),
            // Malformed PHC strings are kept and never verify.
            Self::ARGON2ID_SCHEME => Ok(Self::Argon2id(HashedPassword::from_stored(value))),
            other => Err(AuthError::Internal(format!(
                "Unknown password scheme {}",
                other
            ))),
        }
    }

    pub fn scheme(&self) -> i16 {
        match self {
            Self::Legacy(_) => Self::LEGACY_SCHEME,
            Self::Argon2id(_) => Self::ARGON2ID_SCHEME,
        }
    }

    /// Value as written to the `password_hash` column
    pub fn as_db_str(&self) -> &str {
        match self {
            Self::Legacy(legacy) => &legacy.0,
            Self::Argon2id(hash) => hash.as_phc_string(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_only_rejects_empty() {
        assert!(RawPassword::new(String::new()).is_err());
        // Too short for the policy, still accepted for login.
        assert!(RawPassword::new("abc".to_string()).is_ok());
    }

    #[test]
    fn test_new_password_policy() {
        assert!(NewPassword::new("ValidPass123!".to_string()).is_ok());

        let err = NewPassword::new("short".to_string()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.message().contains("at least"));

        let err = NewPassword::new("password123".to_string()).unwrap_err();
        assert!(err.message().contains("too common"));
    }

    #[test]
    fn test_legacy_hash_verifies_against_login_input() {
        let legacy = LegacyPassword::new("p");
        let hashed = legacy.hash(None).unwrap();
        let typed = RawPassword::new("p".to_string()).unwrap();
        assert!(hashed.verify(typed.inner(), None));
    }

    #[test]
    fn test_stored_password_from_db() {
        let legacy = StoredPassword::from_db(0, "plain".to_string()).unwrap();
        assert!(legacy.is_legacy());
        assert_eq!(legacy.as_db_str(), "plain");
        assert_eq!(legacy.scheme(), StoredPassword::LEGACY_SCHEME);

        let hashed = StoredPassword::from_db(1, "$argon2id$garbage".to_string()).unwrap();
        assert_eq!(hashed.scheme(), StoredPassword::ARGON2ID_SCHEME);

        assert!(StoredPassword::from_db(7, String::new()).is_err());
    }

    #[test]
    fn test_malformed_argon2id_row_fails_closed() {
        let stored = StoredPassword::from_db(1, "plain".to_string()).unwrap();
        let StoredPassword::Argon2id(hash) = stored else {
            panic!("expected argon2id variant");
        };
        let typed = RawPassword::new("plain".to_string()).unwrap();
        assert!(!hash.verify(typed.inner(), None));
    }

    #[test]
    fn test_debug_redaction() {
        let stored = StoredPassword::Legacy(LegacyPassword::new("hunter2"));
        let debug = format!("{:?}", stored);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("hunter2"));

        let raw = RawPassword::new("hunter2".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("hunter2"));
    }
}
