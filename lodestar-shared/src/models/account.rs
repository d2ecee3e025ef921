/// Account model and database operations
///
/// An account is the login identity: a unique email, a password hash and four
/// independent role flags. Rows carry two identifiers. `id` is the internal
/// sequential key used for joins and is never serialized; `public_id` is a
/// random UUID used in URLs, API bodies and as the JWT subject, so row counts
/// and creation order never leak to clients.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE accounts (
///     id BIGSERIAL PRIMARY KEY,
///     public_id UUID NOT NULL DEFAULT gen_random_uuid(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     is_confirmed BOOLEAN NOT NULL DEFAULT FALSE,
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     is_staff BOOLEAN NOT NULL DEFAULT FALSE,
///     is_superuser BOOLEAN NOT NULL DEFAULT FALSE,
///     last_login_at TIMESTAMPTZ,
///     CONSTRAINT accounts_email_key UNIQUE (email),
///     CONSTRAINT accounts_public_id_key UNIQUE (public_id)
/// );
/// ```
///
/// Most callers should go through [`crate::store::AccountStore`], which
/// normalizes emails, hashes passwords and dispatches the welcome email. The
/// functions here are the raw persistence layer.
///
/// # Example
///
/// ```no_run
/// use lodestar_shared::models::account::{Account, UpdateAccount};
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), sqlx::Error> {
/// if let Some(account) = Account::find_by_email(&pool, "user@example.com").await? {
///     let update = UpdateAccount {
///         is_confirmed: Some(true),
///         ..Default::default()
///     };
///     Account::update(&pool, account.id, update).await?;
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::identity::{Authenticatable, PermissionCheck};

/// Name of the unique constraint on `accounts.email`
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "accounts_email_key";

/// Account row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    /// Internal sequential key. Never leaves the server.
    #[serde(skip)]
    pub id: i64,

    /// Public identifier used everywhere a client sees the account
    pub public_id: Uuid,

    /// Set once by the database at insert
    pub created_at: DateTime<Utc>,

    /// Normalized email address, unique across accounts
    pub email: String,

    /// Argon2id PHC string, or an unusable-password marker
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Email address has been confirmed
    pub is_confirmed: bool,

    /// Inactive accounts cannot log in
    pub is_active: bool,

    /// Grants access to the admin console
    pub is_staff: bool,

    /// Holds every permission
    pub is_superuser: bool,

    /// When the account last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for inserting an account
///
/// `email` must already be normalized and `password_hash` already hashed.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
}

/// Partial update. Only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_confirmed: Option<bool>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UpdateAccount {
    fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.password_hash.is_none()
            && self.is_confirmed.is_none()
            && self.is_active.is_none()
            && self.is_staff.is_none()
            && self.is_superuser.is_none()
    }
}

impl Account {
    /// Inserts a new account
    ///
    /// Flags take their column defaults. Fails with a unique violation on
    /// [`EMAIL_UNIQUE_CONSTRAINT`] when the email is taken.
    pub async fn insert(pool: &PgPool, data: NewAccount) -> Result<Self, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, public_id, created_at, email, password_hash, is_confirmed,
                      is_active, is_staff, is_superuser, last_login_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by internal key
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, public_id, created_at, email, password_hash, is_confirmed,
                   is_active, is_staff, is_superuser, last_login_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by public identifier
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use lodestar_shared::models::account::Account;
    /// # use uuid::Uuid;
    /// # async fn example(pool: sqlx::PgPool, public_id: Uuid) -> Result<(), sqlx::Error> {
    /// if let Some(account) = Account::find_by_public_id(&pool, public_id).await? {
    ///     println!("Found account: {}", account.email);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_public_id(
        pool: &PgPool,
        public_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, public_id, created_at, email, password_hash, is_confirmed,
                   is_active, is_staff, is_superuser, last_login_at
            FROM accounts
            WHERE public_id = $1
            "#,
        )
        .bind(public_id)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Finds an account by email
    ///
    /// The match is exact, so callers should pass a normalized address.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, public_id, created_at, email, password_hash, is_confirmed,
                   is_active, is_staff, is_superuser, last_login_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(account)
    }

    /// Updates the fields set in `data`
    ///
    /// Returns None if no account has this key. An empty update is a plain
    /// lookup.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateAccount,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut assignments = Vec::new();
        let mut bind_count = 1;
        let mut assign = |column: &str| {
            bind_count += 1;
            assignments.push(format!("{} = ${}", column, bind_count));
        };

        if data.email.is_some() {
            assign("email");
        }
        if data.password_hash.is_some() {
            assign("password_hash");
        }
        if data.is_confirmed.is_some() {
            assign("is_confirmed");
        }
        if data.is_active.is_some() {
            assign("is_active");
        }
        if data.is_staff.is_some() {
            assign("is_staff");
        }
        if data.is_superuser.is_some() {
            assign("is_superuser");
        }

        let query = format!(
            "UPDATE accounts SET {} WHERE id = $1 RETURNING id, public_id, created_at, email, \
             password_hash, is_confirmed, is_active, is_staff, is_superuser, last_login_at",
            assignments.join(", ")
        );

        // Bind order must follow the assignment order above
        let mut q = sqlx::query_as::<_, Account>(&query).bind(id);
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(password_hash) = data.password_hash {
            q = q.bind(password_hash);
        }
        for flag in [
            data.is_confirmed,
            data.is_active,
            data.is_staff,
            data.is_superuser,
        ]
        .into_iter()
        .flatten()
        {
            q = q.bind(flag);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes an account by internal key
    ///
    /// The account's profile goes with it (`ON DELETE CASCADE`). Returns true if
    /// a row was deleted.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stamps `last_login_at` with the current time
    pub async fn update_last_login(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists accounts, newest first
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, public_id, created_at, email, password_hash, is_confirmed,
                   is_active, is_staff, is_superuser, last_login_at
            FROM accounts
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(accounts)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

impl Authenticatable for Account {
    fn username(&self) -> &str {
        &self.email
    }

    fn password_hash(&self) -> &str {
        &self.password_hash
    }

    fn set_password_hash(&mut self, hash: String) {
        self.password_hash = hash;
    }

    fn is_active(&self) -> bool {
        self.is_active
    }
}

impl PermissionCheck for Account {
    fn is_staff(&self) -> bool {
        self.is_staff
    }

    fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    fn is_permission_active(&self) -> bool {
        self.is_active
    }
}
