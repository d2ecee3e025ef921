//! # Lodestar Shared Library
//!
//! Account storage and authentication primitives used by the Lodestar API
//! server and its admin tooling.
//!
//! ## Module Organization
//!
//! - `models`: Account and profile records with their database operations
//! - `auth`: Password hashing, JWT issuance and the account capability traits
//! - `store`: The account store (`create_user`, `create_superuser`, ...)
//! - `tasks`: Welcome-email task dispatch to an external runner
//! - `email`: Email address normalization
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod email;
pub mod models;
pub mod store;
pub mod tasks;

/// Current version of the Lodestar shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
