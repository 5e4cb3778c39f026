//! End-to-end tests for the market-data gateway.

use crate::helpers::{assert_status, empty_config, TestServer};
use crate::mock_providers::{MockAlpaca, MockYahoo};
use fuse_providers::{AlpacaConfig, YahooConfig};
use fuse_server::AppState;
use pretty_assertions::assert_eq;
use secrecy::SecretString;

fn secret(value: &str) -> Option<SecretString> {
    Some(SecretString::new(value.into()))
}

async fn server(alpaca: AlpacaConfig, yahoo: YahooConfig) -> TestServer {
    let state = AppState::builder(empty_config())
        .alpaca(alpaca)
        .yahoo(yahoo)
        .build()
        .expect("state");
    TestServer::new(state)
}

fn configured_alpaca(uri: String) -> AlpacaConfig {
    AlpacaConfig::new(secret("key-id"), secret("secret")).with_base_url(uri)
}

#[tokio::test]
async fn mixed_symbol_shapes_merge_across_sources() {
    let alpaca = MockAlpaca::start().await;
    let yahoo = MockYahoo::start().await;
    alpaca.mock_snapshots(&[("AAPL", 110.0, 100.0)]).await;
    // Yahoo also quotes AAPL, but at a price that must lose the merge
    yahoo.mock_chart("AAPL", 999.0, 999.0).await;
    yahoo.mock_chart("^VIX", 20.5, 20.0).await;

    let server = server(
        configured_alpaca(alpaca.uri()),
        YahooConfig::new().with_base_url(yahoo.uri()),
    )
    .await;

    let response = server.get("/api/quotes?symbols=AAPL,%5EVIX").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    let result = body["quoteResponse"]["result"]
        .as_array()
        .expect("result array");
    assert_eq!(result.len(), 2);

    // Request order preserved; AAPL came from the higher-precedence feed
    assert_eq!(result[0]["symbol"], "AAPL");
    assert_eq!(result[0]["price"], 110.0);
    assert_eq!(result[0]["chg"], 10.0);
    assert_eq!(result[0]["pct"], 10.0);
    assert_eq!(result[1]["symbol"], "^VIX");
    assert_eq!(result[1]["price"], 20.5);
}

#[tokio::test]
async fn secondary_source_covers_a_primary_outage() {
    let alpaca = MockAlpaca::start().await;
    let yahoo = MockYahoo::start().await;
    alpaca.mock_server_error().await;
    yahoo.mock_chart("AAPL", 110.0, 100.0).await;

    let server = server(
        configured_alpaca(alpaca.uri()),
        YahooConfig::new().with_base_url(yahoo.uri()),
    )
    .await;

    let response = server.get("/api/quotes?symbols=AAPL").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    let result = body["quoteResponse"]["result"]
        .as_array()
        .expect("result array");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["symbol"], "AAPL");
    assert_eq!(result[0]["price"], 110.0);
}

#[tokio::test]
async fn unresolvable_symbols_are_simply_absent() {
    let alpaca = MockAlpaca::start().await;
    let yahoo = MockYahoo::start().await;
    alpaca.mock_snapshots(&[("AAPL", 110.0, 100.0)]).await;
    yahoo.mock_chart("AAPL", 110.0, 100.0).await;
    yahoo.mock_missing("GHOST").await;

    let server = server(
        configured_alpaca(alpaca.uri()),
        YahooConfig::new().with_base_url(yahoo.uri()),
    )
    .await;

    let response = server.get("/api/quotes?symbols=AAPL,GHOST").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    let result = body["quoteResponse"]["result"]
        .as_array()
        .expect("result array");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["symbol"], "AAPL");
}

#[tokio::test]
async fn every_source_failing_is_a_gateway_error() {
    let alpaca = MockAlpaca::start().await;
    let yahoo = MockYahoo::start().await;
    alpaca.mock_server_error().await;
    yahoo.mock_missing("AAPL").await;

    let server = server(
        configured_alpaca(alpaca.uri()),
        YahooConfig::new().with_base_url(yahoo.uri()),
    )
    .await;

    let response = server.get("/api/quotes?symbols=AAPL").await;
    assert_status(&response, 502);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["error"], "all providers failed");
    assert_eq!(body["providers"]["alpaca"]["kind"], "upstream");
    assert_eq!(body["providers"]["yahoo"]["kind"], "empty_payload");
}

#[tokio::test]
async fn blank_symbol_list_is_rejected() {
    let alpaca = MockAlpaca::start().await;
    let yahoo = MockYahoo::start().await;

    let server = server(
        configured_alpaca(alpaca.uri()),
        YahooConfig::new().with_base_url(yahoo.uri()),
    )
    .await;

    let response = server.get("/api/quotes?symbols=%20,%20").await;
    assert_status(&response, 400);
}
