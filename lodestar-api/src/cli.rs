//! Command line interface
//!
//! ```bash
//! lodestar-api serve
//! lodestar-api migrate --database-url postgresql://localhost/lodestar
//! LODESTAR_SUPERUSER_PASSWORD=... lodestar-api create-superuser --email admin@example.com
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lodestar_shared::{
    db::{
        migrations::{ensure_database_exists, get_migration_status, run_migrations},
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::AccountStore,
    tasks::{ChannelDispatcher, HttpTaskDispatcher, LogDispatcher, TaskDispatcher},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    app::{build_router, AppState},
    config::Config,
};

#[derive(Debug, Parser)]
#[command(name = "lodestar-api")]
#[command(about = "Lodestar account API server and admin tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run migrations and start the HTTP server
    Serve,

    /// Apply pending database migrations
    Migrate {
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
    },

    /// Create an account with staff and superuser rights
    CreateSuperuser {
        #[arg(long)]
        email: String,

        #[arg(long, env = "LODESTAR_SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,

        /// Task runner that receives the welcome email
        #[arg(long, env = "WELCOME_EMAIL_TASK_URL")]
        task_url: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve => serve(Config::from_env()?).await,
            Commands::Migrate { database_url } => migrate(&database_url).await,
            Commands::CreateSuperuser {
                email,
                password,
                database_url,
                task_url,
            } => create_superuser(&email, &password, &database_url, task_url).await,
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Lodestar API v{} starting", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(config.pool_config())
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;

    let bind_address = config.bind_address();
    let state = AppState::from_config(pool.clone(), config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn migrate(database_url: &str) -> Result<()> {
    ensure_database_exists(database_url)
        .await
        .context("Failed to create database")?;
    let pool = connect(database_url).await?;

    run_migrations(&pool).await.context("Failed to run migrations")?;

    let status = get_migration_status(&pool).await?;
    println!(
        "Applied {}/{} migrations (latest: {})",
        status.applied_migrations,
        status.known_migrations,
        status
            .latest_version
            .map(|v| v.to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    close_pool(pool).await;
    Ok(())
}

async fn create_superuser(
    email: &str,
    password: &str,
    database_url: &str,
    task_url: Option<String>,
) -> Result<()> {
    let pool = connect(database_url).await?;

    // Collect the welcome email and deliver it before the process exits
    let (channel, mut outbox) = ChannelDispatcher::new();
    let store = AccountStore::new(pool.clone(), Arc::new(channel));

    let account = store.create_superuser(Some(email), password).await?;
    drop(store);
    println!("Created superuser {} ({})", account.email, account.public_id);

    let dispatcher: Arc<dyn TaskDispatcher> = match task_url {
        Some(url) => Arc::new(HttpTaskDispatcher::new(url)?),
        None => Arc::new(LogDispatcher),
    };
    while let Some(params) = outbox.recv().await {
        if let Err(e) = dispatcher.send_welcome_email(params).await {
            warn!(error = %e, "Failed to dispatch welcome email");
        }
    }

    close_pool(pool).await;
    Ok(())
}

async fn connect(database_url: &str) -> Result<sqlx::PgPool> {
    let config = DatabaseConfig {
        url: database_url.to_string(),
        max_connections: 2,
        ..Default::default()
    };
    create_pool(config).await.context("Failed to connect to database")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_superuser() {
        let cli = Cli::try_parse_from([
            "lodestar-api",
            "create-superuser",
            "--email",
            "admin@example.com",
            "--password",
            "changeme-now",
            "--database-url",
            "postgresql://localhost/lodestar",
        ])
        .unwrap();

        match cli.command {
            Commands::CreateSuperuser { email, password, .. } => {
                assert_eq!(email, "admin@example.com");
                assert_eq!(password, "changeme-now");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_serve_takes_no_arguments() {
        let cli = Cli::try_parse_from(["lodestar-api", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve));
    }
}
