//! Alpaca market-data snapshot source.
//!
//! One batched call resolves every requested stock symbol. Index (`^`) and
//! futures (`=F`) symbol shapes are not supported by the feed and are
//! declared unsupported so the aggregator routes them elsewhere.

use crate::normalize::{self, ProviderKind};
use crate::transport::{excerpt, read_body, request_failure};
use async_trait::async_trait;
use fuse_core::{GatewayError, ProviderFailure, ProviderResult, Quote, QuoteSource};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Alpaca source configuration
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    /// Key ID; both keys must be present for the source to be configured
    pub key_id: Option<SecretString>,
    /// Secret key
    pub secret_key: Option<SecretString>,
    /// Data API base URL, overridable for tests
    pub base_url: String,
    /// Market-data feed
    pub feed: String,
    /// Per-call deadline
    pub timeout: Duration,
}

impl AlpacaConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new(key_id: Option<SecretString>, secret_key: Option<SecretString>) -> Self {
        Self {
            key_id,
            secret_key,
            base_url: "https://data.alpaca.markets".to_string(),
            feed: "iex".to_string(),
            timeout: Duration::from_secs(8),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the per-call deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Alpaca quote source
pub struct AlpacaSource {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaSource {
    /// Create the source.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: AlpacaConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn classify(&self, status: StatusCode, body: &str, symbols: &[String]) -> ProviderResult<Vec<Quote>> {
        let json: Value = match serde_json::from_str(body) {
            Ok(json) => json,
            Err(e) if status.is_success() => {
                return Err(ProviderFailure::parse(format!("invalid JSON: {e}")))
            }
            Err(_) => {
                return Err(ProviderFailure::upstream(
                    Some(status.as_u16().to_string()),
                    excerpt(body),
                ))
            }
        };

        if let Ok(envelope) = serde_json::from_value::<ErrorEnvelope>(json.clone()) {
            return Err(ProviderFailure::upstream(
                Some(status.as_u16().to_string()),
                envelope.message,
            ));
        }
        if !status.is_success() {
            return Err(ProviderFailure::upstream(
                Some(status.as_u16().to_string()),
                excerpt(body),
            ));
        }

        let quotes: Vec<Quote> = symbols
            .iter()
            .filter_map(|symbol| {
                json.get(symbol)
                    .and_then(|snapshot| normalize::quote(ProviderKind::AlpacaSnapshot, symbol, snapshot))
            })
            .collect();

        if quotes.is_empty() {
            return Err(ProviderFailure::empty_payload(body));
        }
        Ok(quotes)
    }
}

#[async_trait]
impl QuoteSource for AlpacaSource {
    fn name(&self) -> &str {
        "alpaca"
    }

    fn timeout(&self) -> Duration {
        self.config.timeout
    }

    fn is_configured(&self) -> bool {
        self.config.key_id.is_some() && self.config.secret_key.is_some()
    }

    fn supports(&self, symbol: &str) -> bool {
        !symbol.starts_with('^') && !symbol.ends_with("=F")
    }

    async fn fetch(&self, symbols: &[String]) -> ProviderResult<Vec<Quote>> {
        let (Some(key_id), Some(secret_key)) = (&self.config.key_id, &self.config.secret_key)
        else {
            return Err(ProviderFailure::upstream(None, "no credential configured"));
        };

        let url = format!("{}/v2/stocks/snapshots", self.config.base_url);

        debug!(provider = "alpaca", symbols = symbols.len(), "fetching snapshots");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbols", symbols.join(",")),
                ("feed", self.config.feed.clone()),
            ])
            .header("APCA-API-KEY-ID", key_id.expose_secret())
            .header("APCA-API-SECRET-KEY", secret_key.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| request_failure(e, self.config.timeout))?;

        let (status, body) = read_body(response).await?;
        self.classify(status, &body, symbols)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}
