//! # Fuse Config
//!
//! Immutable configuration snapshot for the Fuse Gateway.
//!
//! The snapshot is built exactly once at process start from the environment
//! and passed by reference into the executors. Nothing reads ambient global
//! state mid-request, and nothing mutates the snapshot after construction.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use secrecy::SecretString;
use std::env;
use std::net::{AddrParseError, IpAddr};
use std::time::Duration;

/// Environment variable holding the Anthropic API key
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the Google AI Studio API key
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the Alpaca key ID
pub const ALPACA_API_KEY: &str = "ALPACA_API_KEY";
/// Environment variable holding the Alpaca secret key
pub const ALPACA_SECRET_KEY: &str = "ALPACA_SECRET_KEY";
/// Environment variable holding the Finnhub API key
pub const FINNHUB_API_KEY: &str = "FINNHUB_API_KEY";
/// Environment variable holding the FRED API key
pub const FRED_API_KEY: &str = "FRED_API_KEY";

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The listen address could not be parsed
    #[error("invalid listen host: {0}")]
    InvalidHost(#[from] AddrParseError),
    /// The listen port could not be parsed
    #[error("invalid listen port: {value}")]
    InvalidPort {
        /// The offending value
        value: String,
    },
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Listen host
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
        }
    }
}

/// Per-upstream credentials, read once from the environment.
///
/// A missing credential is not an error here; the matching adapter simply
/// reports itself unconfigured and the executors skip it.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Anthropic API key
    pub anthropic: Option<SecretString>,
    /// OpenAI API key
    pub openai: Option<SecretString>,
    /// Google AI Studio API key
    pub google: Option<SecretString>,
    /// Alpaca key ID
    pub alpaca_key: Option<SecretString>,
    /// Alpaca secret key
    pub alpaca_secret: Option<SecretString>,
    /// Finnhub API key
    pub finnhub: Option<SecretString>,
    /// FRED API key
    pub fred: Option<SecretString>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mark(value: &Option<SecretString>) -> &'static str {
            if value.is_some() {
                "set"
            } else {
                "unset"
            }
        }
        f.debug_struct("Credentials")
            .field("anthropic", &mark(&self.anthropic))
            .field("openai", &mark(&self.openai))
            .field("google", &mark(&self.google))
            .field("alpaca_key", &mark(&self.alpaca_key))
            .field("alpaca_secret", &mark(&self.alpaca_secret))
            .field("finnhub", &mark(&self.finnhub))
            .field("fred", &mark(&self.fred))
            .finish()
    }
}

/// Per-call deadlines by provider class
#[derive(Debug, Clone)]
pub struct Timeouts {
    /// Language-model backends
    pub completion: Duration,
    /// Quote sources
    pub quote: Duration,
    /// Research/macro providers
    pub research: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            completion: Duration::from_secs(30),
            quote: Duration::from_secs(8),
            research: Duration::from_secs(10),
        }
    }
}

/// Immutable configuration snapshot
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    /// HTTP server settings
    pub server: ServerSettings,
    /// Upstream credentials
    pub credentials: Credentials,
    /// Per-call deadlines
    pub timeouts: Timeouts,
}

impl GatewayConfig {
    /// Build the snapshot from the process environment.
    ///
    /// # Errors
    /// Returns an error when `GATEWAY_HOST` or `GATEWAY_PORT` is present but
    /// unparseable. Missing provider credentials are logged, not errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the snapshot from an arbitrary lookup function.
    ///
    /// # Errors
    /// Same contract as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut server = ServerSettings::default();
        if let Some(host) = lookup("GATEWAY_HOST") {
            server.host = host.parse()?;
        }
        if let Some(port) = lookup("GATEWAY_PORT") {
            server.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value: port })?;
        }

        let secret = |key: &str| {
            let value = lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            if value.is_none() {
                tracing::warn!(variable = key, "credential not set, provider disabled");
            }
            value.map(SecretString::new)
        };

        let credentials = Credentials {
            anthropic: secret(ANTHROPIC_API_KEY),
            openai: secret(OPENAI_API_KEY),
            google: secret(GEMINI_API_KEY),
            alpaca_key: secret(ALPACA_API_KEY),
            alpaca_secret: secret(ALPACA_SECRET_KEY),
            finnhub: secret(FINNHUB_API_KEY),
            fred: secret(FRED_API_KEY),
        };

        Ok(Self {
            server,
            credentials,
            timeouts: Timeouts::default(),
        })
    }

    /// Override the per-call deadlines
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}
