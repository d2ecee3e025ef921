/// Profile endpoints for the authenticated account
///
/// - `GET /v1/me/profile` - Read the profile (404 until one exists)
/// - `PUT /v1/me/profile` - Create or update the profile
///
/// Accounts start without a profile; the first `PUT` creates it.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use lodestar_shared::models::{account::Account, profile::Profile};
use serde::Deserialize;
use validator::Validate;

/// Profile update request
///
/// ```json
/// { "first_name": "Ada" }
/// ```
///
/// A null or missing `first_name` clears it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 255, message = "First name must be at most 255 characters"))]
    pub first_name: Option<String>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> ApiResult<Json<Profile>> {
    let profile = Profile::find_by_account(&state.db, account.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Profile>> {
    req.validate()?;

    let profile =
        Profile::upsert_first_name(&state.db, account.id, req.first_name.as_deref()).await?;

    tracing::debug!(public_id = %account.public_id, "Profile updated");
    Ok(Json(profile))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_length_limit() {
        let ok = UpdateProfileRequest {
            first_name: Some("Ada".to_string()),
        };
        assert!(ok.validate().is_ok());

        let cleared = UpdateProfileRequest { first_name: None };
        assert!(cleared.validate().is_ok());

        let too_long = UpdateProfileRequest {
            first_name: Some("a".repeat(256)),
        };
        assert!(too_long.validate().is_err());
    }
}
