//! Database repositories.
//!
//! Each repository encapsulates the persistence operations for one entity,
//! keeping the service layer storage-agnostic.

pub mod user_repository;
