/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `me`: The authenticated account
/// - `profile`: The authenticated account's profile

pub mod auth;
pub mod health;
pub mod me;
pub mod profile;
