//! CNN Fear & Greed index provider. No credential required.

use crate::transport::{excerpt, read_body, request_failure};
use fuse_core::{GatewayError, ProviderFailure, ProviderResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Fear & Greed provider configuration
#[derive(Debug, Clone)]
pub struct FearGreedConfig {
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Per-call deadline
    pub timeout: Duration,
}

impl Default for FearGreedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://production.dataviz.cnn.io".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl FearGreedConfig {
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

/// Current index reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearGreedSnapshot {
    /// Index score, 0–100
    pub score: u32,
    /// Qualitative rating ("extreme fear" … "extreme greed")
    pub rating: String,
}

/// Fear & Greed index client
pub struct FearGreedClient {
    config: FearGreedConfig,
    client: Client,
}

impl FearGreedClient {
    /// Create the client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: FearGreedConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Fetch the current index reading.
    pub async fn snapshot(&self) -> ProviderResult<FearGreedSnapshot> {
        let url = format!("{}/index/fearandgreed/graphdata/", self.config.base_url);

        debug!(provider = "feargreed", "fetching index");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "Mozilla/5.0 (compatible)")
            .send()
            .await
            .map_err(|e| request_failure(e, self.config.timeout))?;

        let (status, body) = read_body(response).await?;
        if !status.is_success() {
            return Err(ProviderFailure::upstream(
                Some(status.as_u16().to_string()),
                excerpt(&body),
            ));
        }

        let parsed: GraphData = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::parse(format!("invalid JSON: {e}")))?;

        let Some(current) = parsed.fear_and_greed else {
            return Err(ProviderFailure::empty_payload(&body));
        };

        Ok(FearGreedSnapshot {
            score: current.score.round() as u32,
            rating: current.rating,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphData {
    #[serde(default)]
    fear_and_greed: Option<CurrentReading>,
}

#[derive(Debug, Deserialize)]
struct CurrentReading {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    rating: String,
}
