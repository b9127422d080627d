//! ashen-gateway - API gateway for the Ashen Network services
//!
//! **Module Identity:**
//! - Name: ashen-gateway
//! - Port: 4000 (configurable)
//!
//! Aggregates the REST character service and the SOAP guild service under
//! `/api/gateway`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ashen_common::config::load_toml_config;
use ashen_gateway::config::{GatewayConfig, GatewayOverrides};
use ashen_gateway::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for ashen-gateway
#[derive(Parser, Debug)]
#[command(name = "ashen-gateway")]
#[command(about = "REST + SOAP API gateway for Ashen Network")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ASHEN_GATEWAY_PORT")]
    port: Option<u16>,

    /// Base URL of the REST character service
    #[arg(long, env = "ASHEN_REST_URL")]
    rest_url: Option<String>,

    /// Base URL of the SOAP guild service
    #[arg(long, env = "ASHEN_SOAP_URL")]
    soap_url: Option<String>,

    /// Timeout for each backend request, in seconds
    #[arg(long, env = "ASHEN_REQUEST_TIMEOUT")]
    timeout: Option<u64>,

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
        "Starting Ashen Network API gateway (ashen-gateway) v{} [{}] built {}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP")
    );
    info!("Config: {}", source);

    let config = GatewayConfig::resolve(
        GatewayOverrides {
            port: args.port,
            rest_url: args.rest_url,
            soap_url: args.soap_url,
            request_timeout_secs: args.timeout,
        },
        &toml,
    );
    info!("REST service: {}", config.rest_url);
    info!("SOAP service: {}/soap", config.soap_url);
    info!("Backend request timeout: {:?}", config.request_timeout);

    let state = AppState::from_config(&config).context("Failed to build HTTP client")?;
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("ashen-gateway listening on http://{}", addr);
    info!("Health check: http://{}/api/gateway/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
