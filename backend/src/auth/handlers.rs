//! Handler functions for the authentication endpoints.
//!
//! Each handler takes the raw JSON body, normalizes it, runs the matching
//! validation pipeline, and only then deserializes into a typed request
//! for the service. Refresh tokens enter and leave exclusively through
//! the `rt` cookie.

use crate::api::common::{ErrorResponse, service_error_to_http};
use crate::auth::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::auth::service::{AuthService, AuthSession};
use crate::auth::{REFRESH_TOKEN_ERROR, validators};
use crate::config::Config;
use crate::errors::ServiceError;
use crate::utils::cookies;
use crate::validation::ValidationContext;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Json};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;

type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Unwraps the JSON body, turning an extractor rejection into the usual
/// error envelope instead of axum's plain-text response.
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Json<Value>, HandlerError> {
    payload.map_err(|_| service_error_to_http(ServiceError::validation("Malformed request body.")))
}

/// Handle user registration.
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, HandlerError> {
    let Json(mut payload) = json_body(payload)?;
    validators::normalize_register(&mut payload);

    let ctx = ValidationContext {
        pool: &pool,
        body: &payload,
    };
    validators::register_pipeline()
        .run(&ctx)
        .await
        .map_err(service_error_to_http)?;

    let request: RegisterRequest = serde_json::from_value(payload)
        .map_err(|_| service_error_to_http(ServiceError::validation("Malformed request body.")))?;

    let service = AuthService::new(&pool, &config);
    let session = service.register(request).await.map_err(service_error_to_http)?;

    session_response(StatusCode::CREATED, session, &config)
}

/// Handle user login.
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, HandlerError> {
    let Json(mut payload) = json_body(payload)?;
    validators::normalize_login(&mut payload);

    let ctx = ValidationContext {
        pool: &pool,
        body: &payload,
    };
    validators::login_pipeline()
        .run(&ctx)
        .await
        .map_err(service_error_to_http)?;

    let request: LoginRequest = serde_json::from_value(payload)
        .map_err(|_| service_error_to_http(ServiceError::validation("Malformed request body.")))?;

    let service = AuthService::new(&pool, &config);
    let session = service.login(request).await.map_err(service_error_to_http)?;

    session_response(StatusCode::OK, session, &config)
}

/// Handle logout: clears the refresh cookie unconditionally, whether or
/// not a session existed, so repeated calls stay 204.
#[axum::debug_handler]
pub async fn logout() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookies::clear_refresh_cookie());
    (StatusCode::NO_CONTENT, headers).into_response()
}

/// Handle access-token refresh from the cookie-held refresh token. The
/// refresh cookie itself is left untouched.
#[axum::debug_handler]
pub async fn refresh_access_token(
    Extension(pool): Extension<SqlitePool>,
    Extension(config): Extension<Arc<Config>>,
    headers: HeaderMap,
) -> Result<Response, HandlerError> {
    let Some(token) = cookies::refresh_token_from_headers(&headers) else {
        return Err(service_error_to_http(ServiceError::unauthorized(
            REFRESH_TOKEN_ERROR,
        )));
    };

    let service = AuthService::new(&pool, &config);
    let session = service
        .refresh_access_token(&token)
        .await
        .map_err(service_error_to_http)?;

    let body = AuthResponse {
        data: session.user,
        at: session.access_token,
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

/// Builds the success response for transitions that open a session; sets
/// the refresh cookie when the session carries a fresh refresh token.
fn session_response(
    status: StatusCode,
    session: AuthSession,
    config: &Config,
) -> Result<Response, HandlerError> {
    let mut headers = HeaderMap::new();
    if let Some(refresh_token) = &session.refresh_token {
        let cookie = cookies::refresh_cookie(refresh_token, config.refresh_token_ttl_seconds)
            .map_err(|_| {
                service_error_to_http(ServiceError::internal("Failed to build refresh cookie."))
            })?;
        headers.insert(SET_COOKIE, cookie);
    }

    let body = AuthResponse {
        data: session.user,
        at: session.access_token,
    };
    Ok((status, headers, Json(body)).into_response())
}
