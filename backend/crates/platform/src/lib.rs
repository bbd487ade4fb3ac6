//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations that carry no business vocabulary:
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)

pub mod password;
