//! Canonical market-data types.

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};

/// One normalized instrument quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Instrument symbol as requested
    pub symbol: String,
    /// Last traded or regular-market price
    pub price: f64,
    /// Absolute change versus previous close
    pub chg: f64,
    /// Percent change versus previous close
    pub pct: f64,
}

impl Quote {
    /// Build a quote from price and previous close
    #[must_use]
    pub fn from_prices(symbol: impl Into<String>, price: f64, previous_close: f64) -> Self {
        let chg = price - previous_close;
        Self {
            symbol: symbol.into(),
            price,
            chg,
            pct: pct_change(price, previous_close),
        }
    }
}

/// Percent change versus a previous value.
///
/// A zero previous close yields 0, never NaN or infinity.
#[must_use]
pub fn pct_change(price: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (price - previous) / previous * 100.0
    }
}

/// Ordered, non-empty set of requested symbols
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    symbols: Vec<String>,
}

impl QuoteRequest {
    /// Parse a comma-separated symbol list; trims entries, drops empties.
    ///
    /// # Errors
    /// Returns `InvalidInput` when no symbol survives parsing.
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        let symbols: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if symbols.is_empty() {
            return Err(GatewayError::invalid_input("no symbols supplied"));
        }

        Ok(Self { symbols })
    }

    /// Requested symbols, in request order
    #[must_use]
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// Wire response for the market-data gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Envelope expected by the front end
    #[serde(rename = "quoteResponse")]
    pub quote_response: QuoteResult,
}

/// Result list inside the quote envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Resolved quotes, request order where derivable
    pub result: Vec<Quote>,
}

impl QuoteResponse {
    /// Wrap resolved quotes in the wire envelope
    #[must_use]
    pub fn new(result: Vec<Quote>) -> Self {
        Self {
            quote_response: QuoteResult { result },
        }
    }
}
