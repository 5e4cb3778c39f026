//! Shared transport-outcome classification for adapters.

use fuse_core::ProviderFailure;
use reqwest::{Response, StatusCode};
use std::time::Duration;

/// Map a reqwest send error to a provider failure.
///
/// URLs are stripped from the rendered message so query-string credentials
/// never reach logs or the error envelope.
pub(crate) fn request_failure(err: reqwest::Error, limit: Duration) -> ProviderFailure {
    if err.is_timeout() {
        ProviderFailure::timeout(limit)
    } else {
        ProviderFailure::transport(err.without_url().to_string())
    }
}

/// Read the response body, classifying read failures as transport errors.
pub(crate) async fn read_body(response: Response) -> Result<(StatusCode, String), ProviderFailure> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderFailure::transport(e.without_url().to_string()))?;
    Ok((status, body))
}

/// Bounded excerpt of a raw body for diagnostics
pub(crate) fn excerpt(body: &str) -> String {
    const LIMIT: usize = 160;
    let mut out: String = body.chars().take(LIMIT).collect();
    if body.chars().count() > LIMIT {
        out.push('…');
    }
    out
}
