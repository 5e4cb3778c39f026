//! API endpoint tests: health, sentiment, and the macro regime.

use crate::helpers::{assert_status, empty_config, TestServer};
use crate::mock_providers::{MockFred, MockYahoo};
use fuse_providers::{FearGreedConfig, FredConfig, YahooConfig};
use fuse_server::AppState;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn health_reports_version() {
    let state = AppState::from_config(empty_config()).expect("state");
    let server = TestServer::new(state);

    let response = server.get("/health").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn sentiment_returns_the_rounded_index() {
    let cnn = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index/fearandgreed/graphdata/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fear_and_greed": {"score": 61.4, "rating": "greed"}
        })))
        .expect(1)
        .mount(&cnn)
        .await;

    let state = AppState::builder(empty_config())
        .feargreed(FearGreedConfig::new().with_base_url(cnn.uri()))
        .build()
        .expect("state");
    let server = TestServer::new(state);

    let response = server.get("/api/sentiment").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["score"], 61);
    assert_eq!(body["rating"], "greed");
}

#[tokio::test]
async fn sentiment_upstream_outage_is_a_gateway_error() {
    let cnn = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index/fearandgreed/graphdata/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&cnn)
        .await;

    let state = AppState::builder(empty_config())
        .feargreed(FearGreedConfig::new().with_base_url(cnn.uri()))
        .build()
        .expect("state");
    let server = TestServer::new(state);

    let response = server.get("/api/sentiment").await;
    assert_status(&response, 502);
}

#[tokio::test]
async fn regime_scores_deterministically_from_fixture_series() {
    let fred = MockFred::start().await;
    fred.mock_series("FEDFUNDS", &["5.33", "5.33", "5.33"]).await;
    fred.mock_series("T10Y2Y", &["0.80"]).await;
    fred.mock_series(
        "CPIAUCSL",
        &[
            "310.0", "309.0", "308.0", "307.0", "306.0", "305.0", "304.0", "303.0", "302.0",
            "301.5", "301.0", "300.5", "300.0",
        ],
    )
    .await;
    fred.mock_series("UNRATE", &["4.1"]).await;

    let yahoo = MockYahoo::start().await;
    yahoo.mock_chart("^VIX", 12.0, 12.5).await;

    let state = AppState::builder(empty_config())
        .fred(FredConfig::new(Some(SecretString::new("fred-key".into()))).with_base_url(fred.uri()))
        .yahoo(YahooConfig::new().with_base_url(yahoo.uri()))
        .build()
        .expect("state");
    let server = TestServer::new(state);

    let response = server.get("/api/regime").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    // VIX 12 → 30, spread +0.80 → 25, CPI 3.33% YoY → 16, Fed on hold → 12
    assert_eq!(body["score"], 83);
    assert_eq!(body["regime"], "Risk-On Growth");
    assert_eq!(body["label"], "RISK-ON");
    assert_eq!(body["riskAppetite"], "High");
    assert_eq!(body["factors"].as_array().expect("factors").len(), 4);
    assert_eq!(body["vixLevel"], "12.0 (Low)");
    assert!(body["rateEnv"].as_str().expect("rateEnv").contains("Stable"));
}

#[tokio::test]
async fn regime_without_a_fred_key_is_a_configuration_error() {
    let state = AppState::from_config(empty_config()).expect("state");
    let server = TestServer::new(state);

    let response = server.get("/api/regime").await;
    assert_status(&response, 500);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["error"], "FRED_API_KEY not set");
}
