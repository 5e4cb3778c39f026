//! FRED (St. Louis Fed) observation series provider.
//!
//! Feeds the macro regime endpoint. Observations arrive newest-first;
//! missing data points are encoded as "." by the upstream and surface as
//! `None` from [`Observation::value_f64`].

use crate::transport::{excerpt, read_body, request_failure};
use fuse_core::{GatewayError, ProviderFailure, ProviderResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// FRED provider configuration
#[derive(Debug, Clone)]
pub struct FredConfig {
    /// API key; `None` leaves the provider unconfigured
    pub api_key: Option<SecretString>,
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Per-call deadline
    pub timeout: Duration,
}

impl FredConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            api_key,
            base_url: "https://api.stlouisfed.org".to_string(),
            timeout: Duration::from_secs(10),
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

/// FRED API client
pub struct FredClient {
    config: FredConfig,
    client: Client,
}

impl FredClient {
    /// Create the client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: FredConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Whether an API key is available
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Fetch the latest observations for one series, newest first.
    pub async fn observations(
        &self,
        series_id: &str,
        limit: u32,
    ) -> ProviderResult<Vec<Observation>> {
        let Some(api_key) = &self.config.api_key else {
            return Err(ProviderFailure::upstream(None, "no credential configured"));
        };

        let url = format!("{}/fred/series/observations", self.config.base_url);

        debug!(provider = "fred", series = series_id, "fetching observations");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", api_key.expose_secret()),
                ("file_type", "json"),
                ("limit", &limit.to_string()),
                ("sort_order", "desc"),
            ])
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

        let parsed: ObservationsResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderFailure::parse(format!("invalid JSON: {e}")))?;
        Ok(parsed.observations)
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
}

/// One observation of a FRED series
#[derive(Debug, Clone, Deserialize)]
pub struct Observation {
    /// Observation date, YYYY-MM-DD
    #[serde(default)]
    pub date: String,
    /// Observation value as reported; "." marks a missing data point
    #[serde(default)]
    pub value: String,
}

impl Observation {
    /// Numeric value, `None` for missing data points
    #[must_use]
    pub fn value_f64(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}
