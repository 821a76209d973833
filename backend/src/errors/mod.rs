//! Global application error types.
//!
//! This module defines the error taxonomy used across the backend and
//! provides helper constructors for consistent error creation. Every
//! failure that can reach a client is expressed as one of these variants
//! with a fixed, user-facing message.

use thiserror::Error;

/// Generic service error covering every client-visible failure mode.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Field-level validation failure, user-fixable (400).
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Bad credentials or a bad, missing, or expired token (401).
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// A referenced record no longer exists (404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Uniqueness conflict, e.g. a duplicate username (409).
    #[error("Already exists: {message}")]
    AlreadyExists { message: String },

    /// The persistent store failed or was unavailable (500).
    #[error("Database error: {source}")]
    Database {
        #[from]
        source: anyhow::Error,
    },

    /// Any other non-user-fixable failure (500).
    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    // Helper constructors for common patterns

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
