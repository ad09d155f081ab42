//! HTTP server for the bookstore catalog.

pub mod config;
pub mod error;
pub mod routes;
pub mod telemetry;

use anyhow::Context;
use bookstore::{create_pool_with_pg_config, spawn_reaper};
use config::ServerConfig;

/// Load configuration, build the pool and serve until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = ServerConfig::from_env()?;
    let pg_config = config.database.to_pg_config()?;
    let pool = create_pool_with_pg_config(pg_config, &config.pool)
        .context("failed to create connection pool")?;
    let reaper = spawn_reaper(pool.clone(), config.pool.clone(), config.reap_interval);

    let app = routes::create_router(pool.clone());
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(
        addr = %config.bind,
        max_open = config.pool.max_open,
        max_idle = config.pool.max_idle,
        max_lifetime_secs = config.pool.max_lifetime.as_secs(),
        "bookstore server listening"
    );

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => result.context("server error")?,
        _ = tokio::signal::ctrl_c() => tracing::info!("shutdown signal received"),
    }

    reaper.abort();
    pool.close();
    Ok(())
}
