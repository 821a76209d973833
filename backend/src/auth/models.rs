//! Data structures for authentication-related requests and responses.

use crate::database::models::{User, UserRole};
use serde::{Deserialize, Serialize};

/// Registration payload, deserialized after the validation pipeline has
/// vetted the raw body (so the types here always fit).
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: UserRole,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Success envelope for register, login, and refresh: the user record
/// (password hash stripped by its serializer) plus the access token. The
/// refresh token never appears here; it travels only in the cookie.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub data: User,
    pub at: String,
}
