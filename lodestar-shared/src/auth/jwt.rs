/// JWT issuance and validation for accounts
///
/// Token generation is split in two steps so each can be swapped through
/// configuration:
///
/// 1. a **payload handler** turns an [`Account`] into [`Claims`]
/// 2. the claims are **encoded** and signed with HS256
///
/// Both steps read from a [`JwtSettings`] value that callers pass in
/// explicitly. Nothing is read from process-wide state.
///
/// # Example
///
/// ```no_run
/// use lodestar_shared::auth::jwt::{decode_token, JwtSettings};
/// use lodestar_shared::models::account::Account;
///
/// # fn example(account: &Account) -> Result<(), Box<dyn std::error::Error>> {
/// let settings = JwtSettings::new("a-secret-that-is-at-least-32-bytes-long");
/// let token = account.jwt_token(&settings)?;
///
/// let claims = decode_token(&token, &settings)?;
/// assert_eq!(claims.sub, account.public_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::auth::identity::Authenticatable;
use crate::models::account::Account;

/// Default issuer claim
pub const DEFAULT_ISSUER: &str = "lodestar";

/// Default token lifetime in seconds
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 300;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to encode token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer claim does not match the configured issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// Claims carried by an account token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the account's public ID (never the internal key)
    pub sub: Uuid,

    /// Login name (the email address)
    pub username: String,

    /// Email address
    pub email: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Builds the claims for an account at a given instant
pub type PayloadHandler = fn(&Account, &JwtSettings, DateTime<Utc>) -> Claims;

/// Token configuration passed into every issuance and validation call
#[derive(Clone)]
pub struct JwtSettings {
    /// HMAC secret used to sign and verify tokens
    pub secret: String,

    /// Value of the `iss` claim, checked on decode
    pub issuer: String,

    /// How long an issued token stays valid
    pub expiration: Duration,

    /// Turns an account into claims
    pub payload_handler: PayloadHandler,
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

impl JwtSettings {
    /// Settings with the default issuer, lifetime and payload handler
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            expiration: Duration::seconds(DEFAULT_EXPIRATION_SECONDS),
            payload_handler: default_payload_handler,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_expiration(mut self, expiration: Duration) -> Self {
        self.expiration = expiration;
        self
    }

    pub fn with_payload_handler(mut self, handler: PayloadHandler) -> Self {
        self.payload_handler = handler;
        self
    }
}

/// Standard claims: public ID, username, email, issuer and a lifetime window
pub fn default_payload_handler(
    account: &Account,
    settings: &JwtSettings,
    now: DateTime<Utc>,
) -> Claims {
    let expires_at = now + settings.expiration;

    Claims {
        sub: account.public_id,
        username: account.username().to_string(),
        email: account.email.clone(),
        iss: settings.issuer.clone(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    }
}

/// Signs claims with HS256
///
/// Encoding is deterministic: the same claims and secret always give the same token.
pub fn encode_payload(claims: &Claims, settings: &JwtSettings) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(settings.secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Issues a token for `account` valid from `now`
pub fn issue_token_at(
    account: &Account,
    settings: &JwtSettings,
    now: DateTime<Utc>,
) -> Result<String, JwtError> {
    let claims = (settings.payload_handler)(account, settings, now);
    let token = encode_payload(&claims, settings)?;

    tracing::debug!(public_id = %claims.sub, exp = claims.exp, "JWT issued");
    Ok(token)
}

/// Validates signature, expiry and issuer, returning the claims
pub fn decode_token(token: &str, settings: &JwtSettings) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(settings.secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: settings.issuer.clone(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(data.claims)
}

impl Account {
    /// Signed token for this account, recomputed on every call
    pub fn jwt_token(&self, settings: &JwtSettings) -> Result<String, JwtError> {
        issue_token_at(self, settings, Utc::now())
    }
}
