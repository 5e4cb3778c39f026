//! Table-driven response normalization.
//!
//! Extraction rules are data, not call-site control flow: adding a provider
//! means adding a table entry and wiring an adapter, nothing else. Rules
//! return `None` for absent paths and blank values; adapters convert that
//! into an `EmptyPayload` failure.

use fuse_core::Quote;
use serde_json::Value;

/// Upstream provider kind, keying the extraction tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// OpenAI Chat Completions API
    OpenAi,
    /// Google AI Studio (Gemini) generateContent API
    GoogleAi,
    /// Alpaca stock snapshot feed
    AlpacaSnapshot,
    /// Yahoo Finance chart endpoint
    YahooChart,
}

/// One step of an extraction path
#[derive(Debug, Clone, Copy)]
enum Seg {
    /// Object key
    Key(&'static str),
    /// Array index
    Idx(usize),
}

/// Completion text location per provider kind
static TEXT_RULES: &[(ProviderKind, &[Seg])] = &[
    (
        ProviderKind::Anthropic,
        &[Seg::Key("content"), Seg::Idx(0), Seg::Key("text")],
    ),
    (
        ProviderKind::OpenAi,
        &[
            Seg::Key("choices"),
            Seg::Idx(0),
            Seg::Key("message"),
            Seg::Key("content"),
        ],
    ),
    (
        ProviderKind::GoogleAi,
        &[
            Seg::Key("candidates"),
            Seg::Idx(0),
            Seg::Key("content"),
            Seg::Key("parts"),
            Seg::Idx(0),
            Seg::Key("text"),
        ],
    ),
];

/// Quote extraction rule per provider kind
static QUOTE_RULES: &[(ProviderKind, fn(&str, &Value) -> Option<Quote>)] = &[
    (ProviderKind::AlpacaSnapshot, alpaca_snapshot),
    (ProviderKind::YahooChart, yahoo_chart),
];

/// Extract completion text from a success payload.
///
/// Returns `None` when the provider has no rule, the expected path is
/// absent, or the extracted text is blank.
#[must_use]
pub fn completion_text(kind: ProviderKind, payload: &Value) -> Option<String> {
    let (_, path) = TEXT_RULES.iter().find(|(k, _)| *k == kind)?;
    let text = walk(payload, path)?.as_str()?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Normalize one symbol's quote payload.
///
/// Returns `None` when the provider has no rule or the payload lacks a
/// usable price.
#[must_use]
pub fn quote(kind: ProviderKind, symbol: &str, payload: &Value) -> Option<Quote> {
    let (_, rule) = QUOTE_RULES.iter().find(|(k, _)| *k == kind)?;
    rule(symbol, payload)
}

fn walk<'a>(value: &'a Value, path: &[Seg]) -> Option<&'a Value> {
    let mut current = value;
    for seg in path {
        current = match seg {
            Seg::Key(key) => current.get(key)?,
            Seg::Idx(index) => current.get(index)?,
        };
    }
    Some(current)
}

/// Alpaca snapshot: `latestTrade.p` against `prevDailyBar.c`
fn alpaca_snapshot(symbol: &str, snapshot: &Value) -> Option<Quote> {
    let price = snapshot.get("latestTrade")?.get("p")?.as_f64()?;
    let previous = snapshot
        .get("prevDailyBar")
        .and_then(|bar| bar.get("c"))
        .and_then(Value::as_f64)
        .unwrap_or(price);
    Some(Quote::from_prices(symbol, price, previous))
}

/// Yahoo chart: `chart.result[0].meta.regularMarketPrice` against
/// `chartPreviousClose`
fn yahoo_chart(symbol: &str, payload: &Value) -> Option<Quote> {
    let meta = walk(
        payload,
        &[
            Seg::Key("chart"),
            Seg::Key("result"),
            Seg::Idx(0),
            Seg::Key("meta"),
        ],
    )?;
    let price = meta.get("regularMarketPrice")?.as_f64()?;
    if price == 0.0 {
        return None;
    }
    let previous = meta
        .get("chartPreviousClose")
        .and_then(Value::as_f64)
        .unwrap_or(price);
    Some(Quote::from_prices(symbol, price, previous))
}
