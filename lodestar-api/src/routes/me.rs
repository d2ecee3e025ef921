/// Current account endpoint
///
/// ```text
/// GET /v1/me
/// Authorization: Bearer <token>
/// ```

use axum::{Extension, Json};
use lodestar_shared::models::account::Account;

/// Returns the account the bearer token belongs to
pub async fn current_account(Extension(account): Extension<Account>) -> Json<Account> {
    Json(account)
}
