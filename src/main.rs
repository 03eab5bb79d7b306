//! Social API server.
//!
//! Main entry point that loads configuration, prepares the database and
//! hands over to the HTTP layer.

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use social_core::config::AppConfig;
use social_database::DatabasePool;
use social_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = format!("{e:#}"), "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment.
fn load_configuration() -> anyhow::Result<AppConfig> {
    let env = std::env::var("SOCIAL_ENV").unwrap_or_else(|_| "local".to_string());
    AppConfig::load(&env).context("loading configuration")
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        env = %config.server.env,
        "Starting social API server"
    );

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db = DatabasePool::connect(&config.database)
        .await
        .context("connecting to database")?;

    tracing::info!("Running database migrations...");
    run_migrations(db.pool())
        .await
        .context("running migrations")?;
    tracing::info!("Database migrations complete");

    // ── Step 2: Serve until shutdown ─────────────────────────────
    let result = social_api::run_server(config, db.pool().clone()).await;

    db.close().await;
    result.context("serving HTTP")
}
