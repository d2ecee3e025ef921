/// Authentication endpoints
///
/// - `POST /v1/auth/register` - Create an account
/// - `POST /v1/auth/login` - Exchange credentials for a token
///
/// Both answer with the account and a freshly issued JWT.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use lodestar_shared::{models::account::Account, store::AccountError};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
///
/// `email` is optional at the type level so that a missing email gets the
/// account store's error instead of a generic deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account plus a bearer token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub account: Account,
    pub token: String,
}

/// Registers a new account
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss123" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Missing email, bad format or short password
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(mut req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.email = req
        .email
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());
    if req.email.is_none() {
        return Err(AccountError::MissingEmail.into());
    }
    req.validate()?;

    let account = state
        .store
        .create_user(req.email.as_deref(), Some(&req.password))
        .await?;
    let token = account.jwt_token(&state.jwt)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { account, token })))
}

/// Logs in with email and password
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "SecureP@ss123" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email, wrong password or inactive account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let account = state
        .store
        .authenticate(&req.email, &req.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    tracing::info!(public_id = %account.public_id, "Account logged in");

    let token = account.jwt_token(&state.jwt)?;
    Ok(Json(AuthResponse { account, token }))
}
