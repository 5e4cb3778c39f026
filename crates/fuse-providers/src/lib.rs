//! # Fuse Providers
//!
//! Upstream adapter implementations for the Fuse Gateway.
//!
//! Completion backends (tried in fallback order):
//! - Anthropic (Messages API)
//! - OpenAI (Chat Completions API)
//! - Google AI Studio (Gemini)
//!
//! Quote sources (fanned out concurrently):
//! - Alpaca (snapshot feed; stocks only)
//! - Yahoo Finance (chart endpoint; any symbol shape)
//!
//! Research providers:
//! - Finnhub (signals, analyst targets, earnings)
//! - FRED (macro observation series)
//! - CNN Fear & Greed index
//!
//! Payload extraction lives in the table-driven [`normalize`] module; each
//! adapter only builds its wire request and classifies the transport
//! outcome.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod alpaca;
pub mod anthropic;
pub mod feargreed;
pub mod finnhub;
pub mod fred;
pub mod google;
pub mod normalize;
pub mod openai;
pub mod yahoo;

mod transport;

// Re-export main types
pub use alpaca::{AlpacaConfig, AlpacaSource};
pub use anthropic::{AnthropicBackend, AnthropicConfig};
pub use feargreed::{FearGreedClient, FearGreedConfig, FearGreedSnapshot};
pub use finnhub::{FinnhubClient, FinnhubConfig};
pub use fred::{FredClient, FredConfig, Observation};
pub use google::{GoogleBackend, GoogleConfig};
pub use normalize::ProviderKind;
pub use openai::{OpenAiBackend, OpenAiConfig};
pub use yahoo::{YahooConfig, YahooSource};
