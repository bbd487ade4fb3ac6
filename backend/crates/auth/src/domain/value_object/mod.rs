//! Value Object Module

pub mod customer_password;
pub mod email;
