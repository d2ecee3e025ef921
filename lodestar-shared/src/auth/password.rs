/// Password hashing using Argon2id
///
/// Hashes are stored as PHC strings, so the algorithm, parameters and salt
/// travel with the hash and verification needs no extra configuration.
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 64 MiB
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Salt**: 16 random bytes per hash
///
/// Accounts created without a password get an *unusable* password instead: a
/// `!`-prefixed random marker that is not a PHC string and never verifies.
///
/// # Example
///
/// ```
/// use lodestar_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, ParamsBuilder, Version,
};
use rand::{distributions::Alphanumeric, Rng};

/// Prefix marking a password that can never be used to log in
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

const UNUSABLE_PASSWORD_SUFFIX_LEN: usize = 40;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with Argon2id and a fresh random salt
///
/// Output looks like `$argon2id$v=19$m=65536,t=3,p=4$<salt>$<hash>`.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored PHC hash
///
/// Returns `Ok(false)` for a wrong password and an error when `hash` cannot be
/// parsed. Comparison is constant-time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;
    if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash(
            "Hash is missing salt or output".to_string(),
        ));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Produces a marker value that no password will ever verify against
pub fn make_unusable_password() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(UNUSABLE_PASSWORD_SUFFIX_LEN)
        .map(char::from)
        .collect();

    format!("{}{}", UNUSABLE_PASSWORD_PREFIX, suffix)
}

/// False for values produced by [`make_unusable_password`]
pub fn is_password_usable(hash: &str) -> bool {
    !hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
}
