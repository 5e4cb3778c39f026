//! Yahoo Finance chart source.
//!
//! The chart endpoint quotes one symbol per call, so a batched fetch
//! decomposes into concurrent per-symbol sub-calls. Individual misses are
//! tolerated; the source fails only when nothing resolves at all.

use crate::normalize::{self, ProviderKind};
use crate::transport::{excerpt, read_body, request_failure};
use async_trait::async_trait;
use fuse_core::{GatewayError, ProviderFailure, ProviderResult, Quote, QuoteSource};
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo source configuration
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Per-call deadline covering the whole batch
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query2.finance.yahoo.com".to_string(),
            timeout: Duration::from_secs(8),
        }
    }
}

impl YahooConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

/// Yahoo Finance quote source; needs no credential
pub struct YahooSource {
    config: YahooConfig,
    client: Client,
}

impl YahooSource {
    /// Create the source.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: YahooConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    async fn fetch_one(&self, symbol: &str) -> ProviderResult<Quote> {
        // The chart path takes the symbol verbatim; encode the caret that
        // index symbols carry
        let encoded = symbol.replace('^', "%5E");
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1d",
            self.config.base_url, encoded
        );

        let response = self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .header("Referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|e| request_failure(e, self.config.timeout))?;

        let (status, body) = read_body(response).await?;

        let json: serde_json::Value = match serde_json::from_str(&body) {
            Ok(json) => json,
            Err(e) if status.is_success() => {
                return Err(ProviderFailure::parse(format!("invalid JSON: {e}")))
            }
            Err(_) => {
                return Err(ProviderFailure::upstream(
                    Some(status.as_u16().to_string()),
                    excerpt(&body),
                ))
            }
        };

        if !status.is_success() {
            return Err(ProviderFailure::upstream(
                Some(status.as_u16().to_string()),
                excerpt(&body),
            ));
        }

        normalize::quote(ProviderKind::YahooChart, symbol, &json)
            .ok_or_else(|| ProviderFailure::empty_payload(&body))
    }
}

#[async_trait]
impl QuoteSource for YahooSource {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn timeout(&self) -> Duration {
        self.config.timeout
    }

    async fn fetch(&self, symbols: &[String]) -> ProviderResult<Vec<Quote>> {
        debug!(provider = "yahoo", symbols = symbols.len(), "fetching charts");

        let results = join_all(symbols.iter().map(|symbol| self.fetch_one(symbol))).await;

        let mut quotes = Vec::new();
        let mut first_failure = None;
        for result in results {
            match result {
                Ok(quote) => quotes.push(quote),
                Err(failure) => {
                    if first_failure.is_none() {
                        first_failure = Some(failure);
                    }
                }
            }
        }

        if quotes.is_empty() {
            if let Some(failure) = first_failure {
                return Err(failure);
            }
        }
        Ok(quotes)
    }
}
