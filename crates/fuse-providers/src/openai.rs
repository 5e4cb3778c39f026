//! OpenAI Chat Completions API backend.

use crate::normalize::{self, ProviderKind};
use crate::transport::{excerpt, read_body, request_failure};
use async_trait::async_trait;
use fuse_core::{
    CompletionBackend, CompletionRequest, GatewayError, ProviderFailure, ProviderResult,
};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// OpenAI backend configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key; `None` leaves the backend unconfigured
    pub api_key: Option<SecretString>,
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Per-call deadline
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the per-call deadline
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenAI completion backend
pub struct OpenAiBackend {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiBackend {
    /// Create the backend.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatRequest<'_> {
        // Chat Completions accepts system turns in the message array as-is
        ChatRequest {
            model: &self.config.model,
            max_tokens: request.max_tokens_or_default(),
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
        }
    }

    fn classify(&self, status: StatusCode, body: &str) -> ProviderResult<String> {
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
                envelope.error.code.or(envelope.error.kind),
                envelope.error.message,
            ));
        }
        if !status.is_success() {
            return Err(ProviderFailure::upstream(
                Some(status.as_u16().to_string()),
                excerpt(body),
            ));
        }

        normalize::completion_text(ProviderKind::OpenAi, &json)
            .ok_or_else(|| ProviderFailure::empty_payload(body))
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    fn timeout(&self) -> Duration {
        self.config.timeout
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String> {
        let Some(api_key) = &self.config.api_key else {
            return Err(ProviderFailure::upstream(None, "no credential configured"));
        };

        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let wire = self.build_request(request);

        debug!(provider = "openai", model = %self.config.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&wire)
            .send()
            .await
            .map_err(|e| request_failure(e, self.config.timeout))?;

        let (status, body) = read_body(response).await?;
        self.classify(status, &body)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<String>,
}
