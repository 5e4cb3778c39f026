//! # Fuse Server
//!
//! HTTP surface for the Fuse Gateway.
//!
//! This crate provides:
//! - Axum-based HTTP server with graceful shutdown
//! - The completion and market-data gateway endpoints
//! - Research, regime, and sentiment endpoints
//! - The canonical error envelope
//! - Permissive CORS for the separately-hosted front end

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use error::ApiError;
pub use routes::create_router;
pub use server::{Server, ServerConfig};
pub use state::{AppState, AppStateBuilder};
