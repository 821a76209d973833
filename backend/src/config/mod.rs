//! Central module for application-wide configuration settings.
//!
//! Configuration is read from environment variables exactly once at
//! startup. The signing secret and both token lifetimes are mandatory;
//! startup aborts if any of them is missing or malformed.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub server_port: u16,
    /// Shared HMAC secret for signing access and refresh tokens.
    pub jwt_secret: String,
    /// Access-token lifetime in seconds.
    pub access_token_ttl_seconds: u64,
    /// Refresh-token lifetime in seconds. Also drives the `rt` cookie
    /// `Max-Age`.
    pub refresh_token_ttl_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL not set")?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let acquire_timeout_seconds = env::var("DB_ACQUIRE_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<u64>()
            .context("DB_ACQUIRE_TIMEOUT_SECONDS must be a valid number")?;

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("SERVER_PORT must be a valid number")?;

        let jwt_secret = env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY not set")?;

        let access_token_ttl_seconds = env::var("JWT_AT_EXPIRATION_TIME")
            .context("JWT_AT_EXPIRATION_TIME not set")?
            .parse::<u64>()
            .context("JWT_AT_EXPIRATION_TIME must be a valid number of seconds")?;

        let refresh_token_ttl_seconds = env::var("JWT_RT_EXPIRATION_TIME")
            .context("JWT_RT_EXPIRATION_TIME not set")?
            .parse::<u64>()
            .context("JWT_RT_EXPIRATION_TIME must be a valid number of seconds")?;

        Ok(Config {
            database_url,
            max_connections,
            acquire_timeout_seconds,
            server_port,
            jwt_secret,
            access_token_ttl_seconds,
            refresh_token_ttl_seconds,
        })
    }
}
