//! Collection of general utility modules.

pub mod cookies;
pub mod jwt;
