//! Ordered fallback chain over completion backends.
//!
//! Backends are tried strictly in configured priority order. The first
//! success short-circuits the chain; every failure observed before it is
//! recorded so the caller can distinguish a transient timeout from an
//! upstream quota rejection.

use crate::timeout::with_deadline;
use fuse_core::{AggregatedFailure, CompletionBackend, CompletionRequest, GatewayError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a successful chain run
#[derive(Debug, Clone)]
pub struct ChainOutcome {
    /// Normalized completion text from the winning backend
    pub text: String,
    /// Name of the backend that produced the text
    pub provider: String,
    /// Failures observed before the success, in attempt order
    pub failures: AggregatedFailure,
}

/// Fallback chain executor
pub struct FallbackChain {
    backends: Vec<Arc<dyn CompletionBackend>>,
}

impl FallbackChain {
    /// Build a chain; vector order is priority order.
    #[must_use]
    pub fn new(backends: Vec<Arc<dyn CompletionBackend>>) -> Self {
        Self { backends }
    }

    /// Number of backends in the chain, configured or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether the chain has no backends at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Run the chain: first success wins, failures accumulate.
    ///
    /// # Errors
    /// - `NoProviderConfigured` when every backend lacks a credential
    /// - `AllProvidersFailed` with one entry per attempted backend when the
    ///   chain exhausts without a success
    pub async fn run(&self, request: &CompletionRequest) -> Result<ChainOutcome, GatewayError> {
        let mut failures = AggregatedFailure::new();
        let mut attempted = false;

        for backend in &self.backends {
            if !backend.is_configured() {
                debug!(provider = backend.name(), "backend unconfigured, skipping");
                continue;
            }
            attempted = true;

            let started = Instant::now();
            match with_deadline(backend.timeout(), backend.complete(request)).await {
                Ok(text) => {
                    info!(
                        provider = backend.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        fallbacks = failures.len(),
                        "completion succeeded"
                    );
                    return Ok(ChainOutcome {
                        text,
                        provider: backend.name().to_string(),
                        failures,
                    });
                }
                Err(failure) => {
                    warn!(
                        provider = backend.name(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        error = %failure,
                        "backend failed, falling through"
                    );
                    failures.record(backend.name(), failure);
                }
            }
        }

        if !attempted {
            return Err(GatewayError::NoProviderConfigured);
        }
        Err(GatewayError::AllProvidersFailed(failures))
    }
}
