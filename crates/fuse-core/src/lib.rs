//! # Fuse Core
//!
//! Core types, traits, and error handling for the Fuse Gateway.
//!
//! This crate provides the foundational types used throughout the gateway:
//! - Canonical completion and quote request/response types
//! - Provider traits abstracting the upstream services
//! - The failure taxonomy and aggregated-failure type
//! - Pure domain derivations (percent change, macro regime scoring)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod provider;
pub mod quote;
pub mod regime;

// Re-export commonly used types
pub use completion::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageRole, DEFAULT_MAX_TOKENS,
};
pub use error::{AggregatedFailure, FailureKind, GatewayError, ProviderFailure};
pub use provider::{CompletionBackend, ProviderResult, QuoteSource};
pub use quote::{pct_change, Quote, QuoteRequest, QuoteResponse};
pub use regime::{MacroIndicators, RateTrend, RegimeAssessment, RegimeFactor};
