//! Test server and assertion helpers.

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use fuse_config::GatewayConfig;
use fuse_server::{create_router, AppState};
use once_cell::sync::Lazy;
use serde_json::Value;
use tower::ServiceExt;

/// Install a quiet tracing subscriber once for the whole test binary
static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
});

/// Initialize test tracing
pub fn init_tracing() {
    Lazy::force(&TRACING);
}

/// A gateway configuration with no credentials and default timeouts
pub fn empty_config() -> GatewayConfig {
    GatewayConfig::from_lookup(|_| None).expect("config")
}

/// Drives the real router in-process
pub struct TestServer {
    router: Router,
}

impl TestServer {
    /// Build a server around prepared application state
    pub fn new(state: AppState) -> Self {
        init_tracing();
        Self {
            router: create_router(state),
        }
    }

    /// Issue a GET request
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response")
    }

    /// Issue a POST request with a JSON body
    pub async fn post_json(&self, uri: &str, body: &Value) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("response")
    }

    /// Decode a response body as JSON
    pub async fn json_body(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }
}

/// Assert a response status
pub fn assert_status(response: &Response<Body>, expected: u16) {
    assert_eq!(
        response.status(),
        StatusCode::from_u16(expected).expect("status"),
        "unexpected status"
    );
}
