/// Profile model and database operations
///
/// A profile holds optional personal data for exactly one account. Profiles
/// are never created implicitly: an account starts without one, and callers
/// create it when there is something to store. Deleting the account deletes
/// the profile through the foreign key cascade.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE profiles (
///     id BIGSERIAL PRIMARY KEY,
///     account_id BIGINT NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
///     first_name VARCHAR(255),
///     CONSTRAINT profiles_account_id_key UNIQUE (account_id)
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Name of the unique constraint enforcing one profile per account
pub const ACCOUNT_UNIQUE_CONSTRAINT: &str = "profiles_account_id_key";

/// Profile row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    #[serde(skip)]
    pub id: i64,

    /// Internal key of the owning account
    #[serde(skip)]
    pub account_id: i64,

    pub first_name: Option<String>,
}

impl Profile {
    /// Creates the profile for an account
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on [`ACCOUNT_UNIQUE_CONSTRAINT`] if the
    /// account already has a profile, or a foreign key violation if the account
    /// does not exist.
    pub async fn create(
        pool: &PgPool,
        account_id: i64,
        first_name: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (account_id, first_name)
            VALUES ($1, $2)
            RETURNING id, account_id, first_name
            "#,
        )
        .bind(account_id)
        .bind(first_name)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    pub async fn find_by_account(
        pool: &PgPool,
        account_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, account_id, first_name
            FROM profiles
            WHERE account_id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await?;

        Ok(profile)
    }

    /// Sets `first_name`, creating the profile if the account has none
    ///
    /// Passing None clears the name.
    pub async fn upsert_first_name(
        pool: &PgPool,
        account_id: i64,
        first_name: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (account_id, first_name)
            VALUES ($1, $2)
            ON CONFLICT (account_id) DO UPDATE SET first_name = EXCLUDED.first_name
            RETURNING id, account_id, first_name
            "#,
        )
        .bind(account_id)
        .bind(first_name)
        .fetch_one(pool)
        .await?;

        Ok(profile)
    }

    /// Deletes the account's profile, leaving the account in place
    pub async fn delete(pool: &PgPool, account_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE account_id = $1")
            .bind(account_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
