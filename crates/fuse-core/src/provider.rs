//! Provider traits abstracting the upstream services.
//!
//! Adapters are stateless beyond their HTTP client: one invocation issues
//! exactly one outbound call (or a fixed set of sub-calls) and resolves to
//! exactly one [`ProviderResult`]. Retry policy does not exist at this
//! layer; the fallback chain moves to the next backend instead.

use crate::completion::CompletionRequest;
use crate::error::ProviderFailure;
use crate::quote::Quote;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one adapter invocation
pub type ProviderResult<T> = Result<T, ProviderFailure>;

/// A language-model backend in the fallback chain
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Stable provider name used in diagnostics and the response envelope
    fn name(&self) -> &str;

    /// Per-call deadline enforced by the executor
    fn timeout(&self) -> Duration;

    /// Whether a credential is available. Unconfigured backends are skipped
    /// by the chain without counting as an attempt.
    fn is_configured(&self) -> bool {
        true
    }

    /// Produce completion text for the request.
    ///
    /// Blank extracted text must surface as `EmptyPayload`, never as
    /// `Ok("")`.
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<String>;
}

/// A market-data source in the fan-out set
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Stable provider name used in diagnostics
    fn name(&self) -> &str;

    /// Per-call deadline enforced by the aggregator
    fn timeout(&self) -> Duration;

    /// Whether a credential is available
    fn is_configured(&self) -> bool {
        true
    }

    /// Whether this source can quote the given symbol shape
    fn supports(&self, symbol: &str) -> bool {
        let _ = symbol;
        true
    }

    /// Fetch quotes for the supported subset of symbols.
    ///
    /// Missing individual symbols are not an error; the result simply lacks
    /// them. A failure is returned only when the source produced nothing
    /// usable at all.
    async fn fetch(&self, symbols: &[String]) -> ProviderResult<Vec<Quote>>;
}
