//! HTTP server with graceful shutdown.

use std::net::{IpAddr, SocketAddr};
use tracing::info;

use crate::routes::create_router;
use crate::state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen host
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen host
    #[must_use]
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Set the listen port
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl From<&fuse_config::ServerSettings> for ServerConfig {
    fn from(settings: &fuse_config::ServerSettings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
        }
    }
}

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Bind or serve failure
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// The gateway HTTP server
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Create a server from configuration and state
    #[must_use]
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until a shutdown signal arrives.
    ///
    /// # Errors
    /// Returns an error if the listener cannot bind or serving fails.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = SocketAddr::new(self.config.host, self.config.port);
        let router = create_router(self.state);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "gateway listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("gateway stopped");
        Ok(())
    }
}

/// Resolve when ctrl-c or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
