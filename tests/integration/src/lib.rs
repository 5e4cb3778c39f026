//! Integration tests for the Fuse Gateway.
//!
//! Every scenario drives the real router against wiremock provider doubles;
//! no test touches a live upstream.

pub mod helpers;
pub mod mock_providers;

#[cfg(test)]
mod api_tests;
#[cfg(test)]
mod completion_tests;
#[cfg(test)]
mod quotes_tests;
#[cfg(test)]
mod research_tests;
