//! # Fuse Resilience
//!
//! Fault-tolerant composition of provider calls for the Fuse Gateway:
//! - Fallback chain: ordered backends tried sequentially until first success
//! - Fan-out: concurrent sources merged by precedence
//! - Deadline enforcement producing exactly one result per call

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fallback;
pub mod fanout;
pub mod timeout;

// Re-export main types
pub use fallback::{ChainOutcome, FallbackChain};
pub use fanout::{FanOutOutcome, QuoteFanOut};
pub use timeout::with_deadline;
