//! # Fuse Gateway
//!
//! Fault-tolerant aggregation gateway for market-data and AI completion
//! providers.
//!
//! ## Features
//!
//! - Completion gateway with ordered provider fallback (Anthropic, OpenAI,
//!   Google AI)
//! - Market-data gateway fanning out to Alpaca and Yahoo Finance with
//!   precedence merge
//! - Research, macro regime, and sentiment endpoints
//! - Per-provider timeout isolation; one slow upstream never stalls the rest
//!
//! ## Usage
//!
//! ```bash
//! # Start with defaults (0.0.0.0:8080)
//! fuse-gateway
//!
//! # Override the binding
//! GATEWAY_PORT=9000 fuse-gateway
//! ```
//!
//! Provider credentials come from the environment: `ANTHROPIC_API_KEY`,
//! `OPENAI_API_KEY`, `GEMINI_API_KEY`, `ALPACA_API_KEY` +
//! `ALPACA_SECRET_KEY`, `FINNHUB_API_KEY`, `FRED_API_KEY`. Missing keys
//! disable the matching provider; the gateway serves whatever remains.

use fuse_config::GatewayConfig;
use fuse_server::{AppState, Server, ServerConfig};
use fuse_telemetry::{init_logging, LoggingConfig};
use tracing::{error, info};

/// Application entry point
#[tokio::main]
async fn main() {
    // Initialize logging first
    if let Err(e) = init_logging(&LoggingConfig::new().with_level("info")) {
        eprintln!("failed to initialize logging: {e}");
    }

    info!(version = env!("CARGO_PKG_VERSION"), "starting Fuse Gateway");

    if let Err(e) = run().await {
        error!(error = %e, "gateway failed");
        std::process::exit(1);
    }
}

/// Main application logic
async fn run() -> anyhow::Result<()> {
    // Configuration is snapshotted once; nothing re-reads the environment
    // mid-request
    let config = GatewayConfig::from_env()?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        credentials = ?config.credentials,
        "configuration loaded"
    );

    let server_config = ServerConfig::from(&config.server);
    let state = AppState::from_config(config)?;

    let server = Server::new(server_config, state);
    server.run().await?;

    Ok(())
}
