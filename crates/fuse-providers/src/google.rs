//! Google AI Studio (Gemini) backend.
//!
//! Gemini has no system role in the content array: system turns move into
//! `systemInstruction`, and assistant turns map to the `model` role.

use crate::normalize::{self, ProviderKind};
use crate::transport::{excerpt, read_body, request_failure};
use async_trait::async_trait;
use fuse_core::{
    CompletionBackend, CompletionRequest, GatewayError, MessageRole, ProviderFailure,
    ProviderResult,
};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Google AI backend configuration
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// API key; `None` leaves the backend unconfigured
    pub api_key: Option<SecretString>,
    /// API base URL, overridable for tests
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Per-call deadline
    pub timeout: Duration,
}

impl GoogleConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new(api_key: Option<SecretString>) -> Self {
        Self {
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
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

/// Google Gemini completion backend
pub struct GoogleBackend {
    config: GoogleConfig,
    client: Client,
}

impl GoogleBackend {
    /// Create the backend.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GoogleConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::internal(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    fn build_request(&self, request: &CompletionRequest) -> GenerateRequest {
        let mut contents = Vec::new();
        let mut system_parts = Vec::new();

        for message in &request.messages {
            match message.role {
                MessageRole::System => system_parts.push(GooglePart {
                    text: message.content.clone(),
                }),
                MessageRole::User => contents.push(GoogleContent {
                    role: "user",
                    parts: vec![GooglePart {
                        text: message.content.clone(),
                    }],
                }),
                MessageRole::Assistant => contents.push(GoogleContent {
                    role: "model",
                    parts: vec![GooglePart {
                        text: message.content.clone(),
                    }],
                }),
            }
        }

        GenerateRequest {
            contents,
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(SystemInstruction {
                    parts: system_parts,
                })
            },
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens_or_default(),
            },
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
                envelope.error.status,
                envelope.error.message,
            ));
        }
        if !status.is_success() {
            return Err(ProviderFailure::upstream(
                Some(status.as_u16().to_string()),
                excerpt(body),
            ));
        }

        normalize::completion_text(ProviderKind::GoogleAi, &json)
            .ok_or_else(|| ProviderFailure::empty_payload(body))
    }
}

#[async_trait]
impl CompletionBackend for GoogleBackend {
    fn name(&self) -> &str {
        "google"
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

        // Key travels in a header, not the query string, so it can never
        // surface in a rendered URL
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let wire = self.build_request(request);

        debug!(provider = "google", model = %self.config.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose_secret())
            .json(&wire)
            .send()
            .await
            .map_err(|e| request_failure(e, self.config.timeout))?;

        let (status, body) = read_body(response).await?;
        self.classify(status, &body)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GoogleContent {
    role: &'static str,
    parts: Vec<GooglePart>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<GooglePart>,
}

#[derive(Debug, Serialize)]
struct GooglePart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    status: Option<String>,
}
