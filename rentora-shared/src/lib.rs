//! # Rentora Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the Rentora marketplace backend.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `roles`: Role resolution and role assignment (the authorization core)
//! - `auth`: Authentication primitives, session middleware, and the route guard
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod roles;

/// Current version of the Rentora shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
