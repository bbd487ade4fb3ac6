//! API DTOs (Data Transfer Objects)
//!
//! Request types carry passwords and deliberately do not derive `Debug`.

use serde::{Deserialize, Serialize};

use crate::application::CustomerProfile;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfileResponse {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
}

impl From<CustomerProfile> for CustomerProfileResponse {
    fn from(profile: CustomerProfile) -> Self {
        Self {
            customer_id: profile.customer_id.get(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            phone_number: profile.phone_number,
            address: profile.address,
        }
    }
}

// ============================================================================
// Change Password
// ============================================================================

/// Change password request
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
