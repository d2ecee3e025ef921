//! # Lodestar API Server
//!
//! Serves the account API and provides admin commands.
//!
//! ## Usage
//!
//! ```bash
//! lodestar-api serve
//! lodestar-api migrate
//! lodestar-api create-superuser --email admin@example.com
//! ```
//!
//! Set `LOG_FORMAT=json` for JSON log lines.

use clap::Parser;
use lodestar_api::cli::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "lodestar_api=debug,lodestar_shared=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Cli::parse().run().await
}
