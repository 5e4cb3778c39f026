//! Concurrent fan-out over quote sources with precedence merge.
//!
//! Every configured source is invoked at once with the subset of symbols it
//! supports, each under its own deadline. Results merge first-wins by source
//! precedence; a lower-precedence success for an already-satisfied symbol is
//! discarded, never overwrites. Output keeps request order.

use crate::timeout::with_deadline;
use fuse_core::{AggregatedFailure, GatewayError, Quote, QuoteRequest, QuoteSource};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a fan-out run
#[derive(Debug, Clone)]
pub struct FanOutOutcome {
    /// Merged quotes, request order
    pub quotes: Vec<Quote>,
    /// Source failures observed along the way (partial results keep these
    /// for diagnostics without failing the call)
    pub failures: AggregatedFailure,
}

/// Fan-out aggregator over quote sources
pub struct QuoteFanOut {
    sources: Vec<Arc<dyn QuoteSource>>,
}

impl QuoteFanOut {
    /// Build an aggregator; vector order is merge precedence.
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn QuoteSource>>) -> Self {
        Self { sources }
    }

    /// Number of sources, configured or not
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Whether the aggregator has no sources at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fan out to every applicable source and merge by precedence.
    ///
    /// # Errors
    /// - `NoProviderConfigured` when no source is configured for any
    ///   requested symbol
    /// - `AllProvidersFailed` when the merged set is empty and at least one
    ///   source failure was recorded
    pub async fn run(&self, request: &QuoteRequest) -> Result<FanOutOutcome, GatewayError> {
        let mut calls = Vec::new();
        for (precedence, source) in self.sources.iter().enumerate() {
            if !source.is_configured() {
                debug!(provider = source.name(), "source unconfigured, skipping");
                continue;
            }
            let symbols: Vec<String> = request
                .symbols()
                .iter()
                .filter(|s| source.supports(s))
                .cloned()
                .collect();
            if symbols.is_empty() {
                continue;
            }

            let source = Arc::clone(source);
            calls.push(async move {
                let outcome = with_deadline(source.timeout(), source.fetch(&symbols)).await;
                (precedence, source.name().to_string(), outcome)
            });
        }

        if calls.is_empty() {
            return Err(GatewayError::NoProviderConfigured);
        }

        let mut results = futures::future::join_all(calls).await;
        results.sort_by_key(|(precedence, _, _)| *precedence);

        let mut merged: HashMap<String, Quote> = HashMap::new();
        let mut failures = AggregatedFailure::new();
        for (_, name, outcome) in results {
            match outcome {
                Ok(quotes) => {
                    for quote in quotes {
                        // First-wins: higher precedence already claimed the key
                        merged.entry(quote.symbol.clone()).or_insert(quote);
                    }
                }
                Err(failure) => {
                    warn!(provider = %name, error = %failure, "quote source failed");
                    failures.record(name, failure);
                }
            }
        }

        let quotes: Vec<Quote> = request
            .symbols()
            .iter()
            .filter_map(|symbol| merged.remove(symbol))
            .collect();

        if quotes.is_empty() && !failures.is_empty() {
            return Err(GatewayError::AllProvidersFailed(failures));
        }

        Ok(FanOutOutcome { quotes, failures })
    }
}
