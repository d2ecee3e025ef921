/// Authentication primitives for Lodestar accounts
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT payload construction, encoding and validation
/// - [`identity`]: Capability traits implemented by accounts
///
/// # Example
///
/// ```
/// use lodestar_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod identity;
pub mod jwt;
pub mod password;
