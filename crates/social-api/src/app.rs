//! Application builder: wires storage, cache, mailer and router, then serves.

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use tokio::sync::Notify;
use tracing::{info, warn};

use social_cache::UserCache;
use social_core::config::AppConfig;
use social_core::error::AppError;
use social_database::Storage;
use social_service::SmtpMailer;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the social API server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    info!("Starting social API server...");

    // ── Step 1: Bind storage ─────────────────────────────────────
    let storage = Storage::postgres(
        db_pool,
        Duration::from_secs(config.database.query_timeout_seconds),
    );

    // ── Step 2: Initialize cache ─────────────────────────────────
    info!(
        enabled = config.cache.enabled,
        provider = %config.cache.provider,
        "Initializing principal cache"
    );
    let cache = UserCache::from_config(&config.cache).await?;

    // ── Step 3: Initialize mailer ────────────────────────────────
    let mailer = Arc::new(SmtpMailer::new(&config.mail)?);

    // ── Step 4: Build state and router ───────────────────────────
    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, storage, cache, mailer);
    let limiter = Arc::clone(&state.rate_limiter);
    let app = build_app(state);

    // ── Step 5: Background sweep of finished rate-limit windows ──
    let sweeper = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter.purge_expired();
        }
    });

    // ── Step 6: Serve ────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(%addr, "Social API server listening");

    let stopping = Arc::new(Notify::new());
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown({
        let stopping = Arc::clone(&stopping);
        async move {
            shutdown_signal().await;
            stopping.notify_one();
        }
    })
    .into_future();

    tokio::select! {
        result = server => {
            result.map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = async {
            stopping.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(grace_secs = grace.as_secs(), "Grace period elapsed, dropping open connections");
        }
    }

    sweeper.abort();
    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
