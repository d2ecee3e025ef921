//! # Lodestar API Server Library
//!
//! HTTP surface and admin commands for the Lodestar account store.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and JWT middleware
//! - `cli`: Command line interface (`serve`, `migrate`, `create-superuser`)
//! - `config`: Configuration loaded from the environment
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod routes;
