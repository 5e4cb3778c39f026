//! Deadline enforcement for provider calls.
//!
//! Wraps a provider future so that every invocation resolves to exactly one
//! [`ProviderResult`]: either the provider's own outcome, or `Timeout` once
//! the deadline elapses. The in-flight call is dropped on expiry, so a late
//! response can never report a second time.

use fuse_core::{ProviderFailure, ProviderResult};
use std::future::Future;
use std::time::Duration;

/// Run a provider call under a fixed deadline.
pub async fn with_deadline<T, F>(limit: Duration, call: F) -> ProviderResult<T>
where
    F: Future<Output = ProviderResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(outcome) => outcome,
        Err(_) => Err(ProviderFailure::timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuse_core::FailureKind;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn completes_within_deadline() {
        let result = with_deadline(Duration::from_secs(8), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, ProviderFailure>(42)
        })
        .await;
        assert_eq!(result.expect("in time"), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_maps_to_timeout_failure() {
        let started = Instant::now();
        let result: ProviderResult<()> = with_deadline(Duration::from_secs(8), async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        })
        .await;

        let failure = result.expect_err("deadline exceeded");
        assert_eq!(failure.kind(), FailureKind::Timeout);
        // Bounded by the deadline, never by the hanging call
        assert_eq!(started.elapsed(), Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_passes_through() {
        let result: ProviderResult<()> = with_deadline(Duration::from_secs(8), async {
            Err(ProviderFailure::transport("connection refused"))
        })
        .await;
        assert_eq!(
            result.expect_err("provider failed").kind(),
            FailureKind::Transport
        );
    }
}
