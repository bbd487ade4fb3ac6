//! Entity Module

pub mod customer;
