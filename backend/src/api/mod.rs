//! Shared API surface helpers.

pub mod common;
