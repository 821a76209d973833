//! Defines the HTTP routes for authentication.
//!
//! These are designed to be nested under `/auth` in the main Axum router.

use crate::auth::handlers::*;
use axum::{Router, routing::post};

/// Creates the authentication router with all auth-related routes.
pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-access-token", post(refresh_access_token))
}
