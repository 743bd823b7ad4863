//! Client-related types shared between server and client
//!
//! Request/response bodies of the `/api/auth` endpoints.

use serde::{Deserialize, Serialize};

use crate::models::Admin;
use crate::validation::{self, Validate, ValidationErrors};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login / register response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: Admin,
}

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::person_name(&mut errors, "full_name", &self.full_name);
        validation::email(&mut errors, "email", &self.email);
        validation::username(&mut errors, "username", &self.username);
        validation::optional_phone(&mut errors, "phone", self.phone.as_deref());
        validation::password(&mut errors, "password", &self.password);
        errors.into_result()
    }
}
