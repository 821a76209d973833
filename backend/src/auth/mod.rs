//! Authentication module: registration, login, logout, and access-token
//! refresh.
//!
//! Handlers run the sanitization and validation pipelines over the raw
//! request body, then hand typed requests to the service, which talks to
//! the user repository and the token service.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod validators;

/// Fixed message for any refresh-token failure, whatever the cause.
pub const REFRESH_TOKEN_ERROR: &str = "Invalid refresh token.";

/// Identical for unknown usernames and wrong passwords, so responses never
/// reveal which one was wrong.
pub const LOGIN_FAILED: &str = "Incorrect username or password.";

pub const DUPLICATE_USERNAME: &str = "A user with this username already exists.";

pub const USER_NOT_FOUND: &str = "User not found.";
