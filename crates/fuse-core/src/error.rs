//! Error taxonomy for the gateway.
//!
//! Every adapter invocation resolves to either a payload or a
//! [`ProviderFailure`]; failures never propagate as panics. The executor and
//! aggregator escalate to a [`GatewayError`] only when the aggregate
//! condition is met (chain exhausted, empty merge, no provider configured).

use serde::Serialize;
use std::time::Duration;

/// Maximum length of the raw-body excerpt carried by an empty-payload failure
const EXCERPT_LIMIT: usize = 160;

/// Typed outcome of one failed adapter invocation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderFailure {
    /// Network-level failure: connection refused/reset, DNS, TLS
    #[error("transport error: {message}")]
    Transport {
        /// Short transport diagnostic
        message: String,
    },

    /// The configured per-call deadline elapsed before a response arrived
    #[error("deadline of {limit:?} exceeded")]
    Timeout {
        /// The deadline that was exceeded
        limit: Duration,
    },

    /// The response body could not be decoded
    #[error("unparseable response: {message}")]
    Parse {
        /// Decode diagnostic
        message: String,
    },

    /// A well-formed error object returned by the upstream service
    #[error("upstream error{}: {message}", code_suffix(.code))]
    Upstream {
        /// Upstream-supplied error code, when present
        code: Option<String>,
        /// Upstream-supplied message
        message: String,
    },

    /// HTTP success carrying no usable content
    #[error("empty payload: {excerpt}")]
    EmptyPayload {
        /// Bounded excerpt of the raw body, for diagnosis
        excerpt: String,
    },
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" ({c})"))
        .unwrap_or_default()
}

impl ProviderFailure {
    /// Transport-level failure
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Deadline exceeded
    #[must_use]
    pub fn timeout(limit: Duration) -> Self {
        Self::Timeout { limit }
    }

    /// Malformed response body
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Explicit error object from the upstream
    pub fn upstream(code: Option<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            code,
            message: message.into(),
        }
    }

    /// Empty/blank payload; keeps a bounded excerpt of the raw body
    pub fn empty_payload(raw_body: &str) -> Self {
        let mut excerpt: String = raw_body.chars().take(EXCERPT_LIMIT).collect();
        if raw_body.chars().count() > EXCERPT_LIMIT {
            excerpt.push('…');
        }
        Self::EmptyPayload { excerpt }
    }

    /// The failure kind, for classification in the error envelope
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } => FailureKind::Transport,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Parse { .. } => FailureKind::Parse,
            Self::Upstream { .. } => FailureKind::Upstream,
            Self::EmptyPayload { .. } => FailureKind::EmptyPayload,
        }
    }
}

/// Failure classification surfaced in the canonical error envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network/connection failure
    Transport,
    /// Deadline exceeded
    Timeout,
    /// Malformed response body
    Parse,
    /// Well-formed upstream error object
    Upstream,
    /// HTTP success with no usable content
    EmptyPayload,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Timeout => write!(f, "timeout"),
            Self::Parse => write!(f, "parse"),
            Self::Upstream => write!(f, "upstream"),
            Self::EmptyPayload => write!(f, "empty_payload"),
        }
    }
}

/// Every attempted provider's failure, keyed by provider name.
///
/// Entries keep attempt order. Non-empty iff the overall call failed;
/// providers skipped for missing configuration never appear here.
#[derive(Debug, Clone, Default)]
pub struct AggregatedFailure {
    entries: Vec<(String, ProviderFailure)>,
}

impl AggregatedFailure {
    /// Empty aggregate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one provider's failure
    pub fn record(&mut self, provider: impl Into<String>, failure: ProviderFailure) {
        self.entries.push((provider.into(), failure));
    }

    /// Attempted providers and their failures, in attempt order
    #[must_use]
    pub fn entries(&self) -> &[(String, ProviderFailure)] {
        &self.entries
    }

    /// Number of attempted providers
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any failure was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Display for AggregatedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (provider, failure) in &self.entries {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{provider}: {failure}")?;
            first = false;
        }
        Ok(())
    }
}

/// Gateway-level error returned to the HTTP surface
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// Malformed or missing caller request fields
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the request
        message: String,
    },

    /// No credential is available for any provider in the chain
    #[error("no provider configured")]
    NoProviderConfigured,

    /// Every attempted provider failed
    #[error("all providers failed: {0}")]
    AllProvidersFailed(AggregatedFailure),

    /// Unexpected internal condition
    #[error("internal error: {message}")]
    Internal {
        /// Diagnostic message
        message: String,
    },
}

impl GatewayError {
    /// Invalid caller input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
