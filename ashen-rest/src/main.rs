//! ashen-rest - Character/Item REST microservice
//!
//! **Module Identity:**
//! - Name: ashen-rest
//! - Port: 3001 (configurable)
//!
//! Serves characters and items from SQLite. Consumed by ashen-gateway.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ashen_common::config::{
    load_toml_config, resolve_setting, DEFAULT_DATABASE_PATH, DEFAULT_REST_PORT,
};
use ashen_rest::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for ashen-rest
#[derive(Parser, Debug)]
#[command(name = "ashen-rest")]
#[command(about = "Character and item REST service for Ashen Network")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ASHEN_REST_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "ASHEN_REST_DB")]
    database: Option<PathBuf>,

    /// TOML config file (defaults to <config dir>/ashen/config.toml)
    #[arg(short, long, env = "ASHEN_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    // The config file may set the default log level, so it is read before the
    // subscriber exists and its source is logged afterwards.
    let (toml, source) =
        load_toml_config(args.config.as_deref()).context("Failed to load config")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml.logging.level)),
        )
        .init();

    info!(
        "Starting Ashen Network REST service (ashen-rest) v{} [{}] built {}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP")
    );
    info!("Config: {}", source);

    let port = resolve_setting(args.port, toml.rest.port, DEFAULT_REST_PORT);
    let db_path = resolve_setting(
        args.database,
        toml.rest.database_path,
        PathBuf::from(DEFAULT_DATABASE_PATH),
    );
    info!("Database path: {}", db_path.display());

    let pool = ashen_rest::db::init_database_pool(&db_path)
        .await
        .context("Failed to open character database")?;
    info!("✓ Connected to database");

    let app = build_router(AppState::new(pool.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("ashen-rest listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Database closed, shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
