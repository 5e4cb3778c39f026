//! Canonical completion request and response types.
//!
//! The request shape abstracts over every language-model backend; adapters
//! translate it into each provider's wire convention.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};

/// Output budget applied when the caller does not supply `max_tokens`
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Provider-agnostic completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Conversation turns, oldest first
    pub messages: Vec<Message>,

    /// Maximum output size; defaults to [`DEFAULT_MAX_TOKENS`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Create a request from conversation turns
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            max_tokens: None,
        }
    }

    /// Set the output budget
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Effective output budget
    #[must_use]
    pub fn max_tokens_or_default(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Validate the request
    ///
    /// # Errors
    /// Returns `InvalidInput` if the message sequence is empty or any turn
    /// has blank content.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.messages.is_empty() {
            return Err(GatewayError::invalid_input("messages cannot be empty"));
        }
        if self
            .messages
            .iter()
            .any(|m| m.content.trim().is_empty())
        {
            return Err(GatewayError::invalid_input(
                "message content cannot be blank",
            ));
        }
        if let Some(max_tokens) = self.max_tokens {
            if max_tokens == 0 {
                return Err(GatewayError::invalid_input("max_tokens must be positive"));
            }
        }
        Ok(())
    }
}

/// One conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author
    pub role: MessageRole,
    /// Text content of the turn
    pub content: String,
}

impl Message {
    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction
    System,
    /// End-user message
    User,
    /// Model output from a previous turn
    Assistant,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Canonical completion response returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Response content blocks
    pub content: Vec<ContentBlock>,
    /// Name of the provider that produced the text
    pub provider: String,
}

impl CompletionResponse {
    /// Build a single-text-block response
    pub fn text(provider: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            provider: provider.into(),
        }
    }
}

/// Typed content block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text block
    Text {
        /// The extracted text
        text: String,
    },
}
