/// Database layer for Lodestar
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Embedded migration runner
///
/// Account and profile queries live in the `models` module at crate root.
///
/// # Example
///
/// ```no_run
/// use lodestar_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;

/// SQLSTATE reported by PostgreSQL for a unique constraint violation
pub const UNIQUE_VIOLATION: &str = "23505";

/// Returns true when `err` is a unique constraint violation
///
/// When `constraint` is given, the violated constraint must also match it.
pub fn is_unique_violation(err: &sqlx::Error, constraint: Option<&str>) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            let code_matches = db_err.code().as_deref() == Some(UNIQUE_VIOLATION);
            match constraint {
                Some(name) => code_matches && db_err.constraint() == Some(name),
                None => code_matches,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound, None));
        assert!(!is_unique_violation(
            &sqlx::Error::PoolTimedOut,
            Some("accounts_email_key")
        ));
    }
}
