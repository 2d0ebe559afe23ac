//! Miniflux Bridge (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                MINIFLUX BRIDGE               │
//!                        │                                              │
//!   Local caller         │  ┌─────────┐    ┌──────────┐    ┌──────────┐ │
//!   ─────────────────────┼─▶│  http   │───▶│ handlers │───▶│ upstream │─┼──▶ Miniflux
//!   127.0.0.1:5001       │  │ server  │    │ (routes) │    │  client  │ │    /v1/...
//!                        │  └─────────┘    └──────────┘    └────┬─────┘ │
//!                        │                                      │       │
//!   JSON + status        │                                ┌─────▼─────┐ │
//!   ◀────────────────────┼────────────────────────────────│  outcome  │ │
//!                        │                                │ classifier│ │
//!                        │                                └───────────┘ │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use miniflux_bridge::config::{finalize, load_from_env, validation::check_upstream_url, BridgeConfig};
use miniflux_bridge::lifecycle::{spawn_signal_listener, Shutdown};
use miniflux_bridge::observability::init_logging;
use miniflux_bridge::{BridgeServer, MinifluxClient};

#[derive(Parser)]
#[command(name = "miniflux-bridge")]
#[command(about = "Local HTTP bridge to the Miniflux REST API", long_about = None)]
struct Cli {
    /// Optional TOML config file (falls back to MINIFLUX_BRIDGE_CONFIG).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (must be loopback).
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the log level (RUST_LOG still wins).
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut BridgeConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_from_env(cli.config.as_deref())?;
    cli.apply(&mut config);
    let config = finalize(config)?;

    init_logging(&config.observability);

    tracing::info!("miniflux-bridge v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(problem) = check_upstream_url(&config.upstream) {
        tracing::warn!(error = %problem, "Upstream routes will fail until MINIFLUX_URL is fixed");
    }

    let client = MinifluxClient::from_config(&config.upstream)?;
    match client.endpoint() {
        Some(endpoint) => tracing::info!(
            upstream = %endpoint.base_url,
            timeout_secs = config.upstream.timeout_secs,
            "Configuration loaded"
        ),
        None => tracing::error!(
            "MINIFLUX_URL or MINIFLUX_API_KEY not set; upstream routes will return 500"
        ),
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    spawn_signal_listener(shutdown.clone());

    BridgeServer::new(client)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
