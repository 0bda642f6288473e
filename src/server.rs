//! HTTP server initialization and runtime setup.
//!
//! Handles storage and cache setup, background task spawning, and the Axum
//! server lifecycle including graceful shutdown.

use crate::config::{Config, StorageBackend};
use crate::domain::click_event::ClickRecorder;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{MemoryLinkRepository, PgLinkRepository};
use crate::routes::app_router;
use crate::state::{AppState, StateSettings};
use crate::telemetry;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// How long shutdown waits for pending click increments.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens the PostgreSQL pool with the configured limits and applies migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing, the connection fails, or a
/// migration cannot be applied.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    Ok(pool)
}

/// Builds the link store selected by `STORAGE_BACKEND`.
///
/// # Errors
///
/// Propagates database connection and migration failures.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = connect_database(config).await?;
            Ok(Arc::new(PgLinkRepository::new(Arc::new(pool))))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, links are lost on restart");
            Ok(Arc::new(MemoryLinkRepository::new()))
        }
    }
}

/// Connects to Redis if configured, otherwise (or on failure) falls back to [`NullCache`].
pub async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link store (PostgreSQL with migrations, or in-memory)
/// - Redis cache (or NullCache fallback)
/// - Background click worker
/// - Expiry sweeper
/// - Prometheus recorder served on `/metrics`
/// - Axum HTTP server
///
/// On Ctrl-C or SIGTERM the server stops accepting connections, the sweeper
/// is signalled to stop, and pending click increments are flushed before
/// returning.
///
/// # Errors
///
/// Returns an error if:
/// - Storage initialization fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let metrics = telemetry::install_metrics();

    let repository = build_repository(&config).await?;
    let cache = build_cache(&config).await;

    let storage = config.storage_policy();
    let (clicks, click_rx) = ClickRecorder::channel(config.click_queue_capacity);

    let click_worker = tokio::spawn(run_click_worker(
        click_rx,
        repository.clone(),
        config.click_worker_concurrency,
        storage,
    ));

    let state = AppState::new(
        repository,
        cache,
        clicks,
        StateSettings {
            generator: CodeGenerator::new(config.code_policy()),
            storage,
            base_url: config.base_url.clone(),
            default_ttl_seconds: config.default_ttl_seconds,
            sweep_interval: config.sweep_interval(),
        },
    )
    .with_metrics(metrics.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    if let Some(handle) = metrics {
        tokio::spawn(telemetry::run_metrics_upkeep(handle, shutdown_rx.clone()));
    }

    let sweeper = state.sweeper.clone();
    let sweeper_task = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped, shutting down background tasks");

    let _ = shutdown_tx.send(true);
    if let Err(e) = sweeper_task.await {
        tracing::error!("Expiry sweeper task failed: {}", e);
    }

    // The router, and with it the last click sender, is gone; the worker
    // exits once in-flight increments finish.
    match tokio::time::timeout(CLICK_DRAIN_TIMEOUT, click_worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Click worker task failed: {}", e),
        Err(_) => tracing::warn!("Timed out waiting for pending clicks to flush"),
    }

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received");
}
