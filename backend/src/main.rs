//! Main entry point for the authentication backend.
//!
//! This file initializes the Axum web server, loads configuration, sets up
//! the database connection, and registers all API routes. Startup is
//! fail-fast: missing configuration or an unreachable database aborts the
//! process before the server binds.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod utils;
mod validation;

use crate::api::common::ErrorResponse;
use axum::http::{StatusCode, Uri};
use axum::{Extension, Router, response::Json, routing::get};
use config::Config;
use database::Database;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() {
    init();

    let config = Config::from_env().unwrap();
    let db = Database::new(&config).await.unwrap();
    let pool = db.pool().clone();

    let app = Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .fallback(route_not_found)
        .layer(Extension(pool))
        .layer(Extension(Arc::new(config.clone())));

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await.unwrap();

    info!("Starting auth server on port {}", config.server_port);
    axum::serve(listener, app).await.unwrap();
}

async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "App is running." }))
}

/// 404 for every route the router does not know, naming the path asked for.
async fn route_not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: format!("This route does not exist: {}", uri),
        }),
    )
}
