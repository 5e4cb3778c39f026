//! End-to-end tests for the Finnhub-backed research endpoint.

use crate::helpers::{assert_status, empty_config, TestServer};
use crate::mock_providers::MockFinnhub;
use fuse_providers::FinnhubConfig;
use fuse_server::AppState;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;

async fn server(finnhub: &MockFinnhub) -> TestServer {
    let state = AppState::builder(empty_config())
        .finnhub(
            FinnhubConfig::new(Some(SecretString::new("fh-key".into())))
                .with_base_url(finnhub.uri()),
        )
        .build()
        .expect("state");
    TestServer::new(state)
}

#[tokio::test]
async fn signals_report_aggregates_eight_sub_calls() {
    let finnhub = MockFinnhub::start().await;
    finnhub.mock_signals_fixture().await;

    let server = server(&finnhub).await;
    let response = server.get("/api/research?type=signals&symbol=aapl").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["ticker"], "AAPL");
    assert_eq!(body["company"], "Apple Inc");
    assert_eq!(body["industry"], "Technology");
    assert_eq!(body["price"], 100.0);
    // 20 of 30 analysts bullish, 2 bearish
    assert_eq!(body["bull"], 67);
    assert_eq!(body["bear"], 7);
    assert_eq!(body["totalAnalysts"], 30);
    assert_eq!(body["analystPT"], 120);
    assert_eq!(body["ptUpside"], "20.0");
    assert_eq!(body["headlines"].as_array().expect("headlines").len(), 1);
    assert_eq!(body["insiderSignal"], "Bullish");
    assert!(body["earningsDays"].as_i64().expect("countdown") > 0);
}

#[tokio::test]
async fn targets_report_passes_through_the_aggregate() {
    let finnhub = MockFinnhub::start().await;
    finnhub
        .mock_endpoint(
            "/stock/price-target",
            json!({"targetMean": 120.0, "targetHigh": 150.0, "targetLow": 90.0}),
        )
        .await;
    finnhub
        .mock_endpoint(
            "/stock/recommendation",
            json!([{"buy": 10, "strongBuy": 5, "hold": 4, "sell": 1, "strongSell": 0,
                    "period": "2024-05-01"}]),
        )
        .await;
    finnhub
        .mock_endpoint("/quote", json!({"c": 101.0, "d": 1.0, "dp": 1.0}))
        .await;

    let server = server(&finnhub).await;
    let response = server.get("/api/research?type=targets&symbol=AAPL").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["targets"]["targetMean"], 120.0);
    assert_eq!(body["rec"]["buy"], 10);
    assert_eq!(body["price"], 101.0);
}

#[tokio::test]
async fn earnings_report_combines_history_and_calendar() {
    let finnhub = MockFinnhub::start().await;
    finnhub
        .mock_endpoint(
            "/stock/earnings",
            json!([{"period": "2024-03-31", "surprise": 0.05, "surprisePercent": 3.2,
                    "actual": 1.55, "estimate": 1.50}]),
        )
        .await;
    finnhub
        .mock_endpoint(
            "/calendar/earnings",
            json!({"earningsCalendar": [{"date": "2099-01-15"}]}),
        )
        .await;

    let server = server(&finnhub).await;
    let response = server.get("/api/research?type=earnings&symbol=AAPL").await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["surprises"][0]["surprisePercent"], 3.2);
    assert_eq!(body["calendar"]["earningsCalendar"][0]["date"], "2099-01-15");
}

#[tokio::test]
async fn missing_symbol_is_rejected() {
    let finnhub = MockFinnhub::start().await;
    let server = server(&finnhub).await;

    let response = server.get("/api/research?type=signals").await;
    assert_status(&response, 400);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["error"], "symbol required");
}

#[tokio::test]
async fn unknown_report_type_is_rejected() {
    let finnhub = MockFinnhub::start().await;
    let server = server(&finnhub).await;

    let response = server.get("/api/research?type=vibes&symbol=AAPL").await;
    assert_status(&response, 400);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["error"], "invalid type");
}

#[tokio::test]
async fn missing_key_is_a_configuration_error() {
    let state = AppState::from_config(empty_config()).expect("state");
    let server = TestServer::new(state);

    let response = server.get("/api/research?type=signals&symbol=AAPL").await;
    assert_status(&response, 500);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["error"], "FINNHUB_API_KEY not set");
}
