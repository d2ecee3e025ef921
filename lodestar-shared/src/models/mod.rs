/// Database models for Lodestar
///
/// Each model carries its own CRUD operations as associated functions that
/// take a `&PgPool`, returning `sqlx::Error` on failure.
///
/// # Models
///
/// - [`account::Account`]: Login identity with role flags and a hashed password
/// - [`profile::Profile`]: Optional personal data, one-to-one with an account

pub mod account;
pub mod profile;
