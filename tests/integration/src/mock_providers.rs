//! Wiremock doubles for the upstream providers.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock Anthropic Messages API
pub struct MockAnthropic {
    /// The underlying server
    pub server: MockServer,
}

impl MockAnthropic {
    /// Start the mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL for adapter configuration
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Respond with a successful completion
    pub async fn mock_success(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": text}],
                "model": "claude-3-5-sonnet-20241022",
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Respond with a quota rejection
    pub async fn mock_quota_error(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "type": "error",
                "error": {"type": "rate_limit_error", "message": "quota exceeded"}
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Respond 200 with blank content
    pub async fn mock_empty_content(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": ""}]
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }
}

/// Mock OpenAI Chat Completions API
pub struct MockOpenAi {
    /// The underlying server
    pub server: MockServer,
}

impl MockOpenAi {
    /// Start the mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL for adapter configuration
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Respond with a successful completion
    pub async fn mock_success(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 2}
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Respond with a server error
    pub async fn mock_server_error(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": {"message": "internal server error", "type": "server_error", "code": null}
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Expect this backend never to be consulted
    pub async fn expect_no_calls(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "should not happen"}}]
            })))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}

/// Mock Alpaca snapshot feed
pub struct MockAlpaca {
    /// The underlying server
    pub server: MockServer,
}

impl MockAlpaca {
    /// Start the mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL for adapter configuration
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Respond with snapshots; each entry is (symbol, price, previous close)
    pub async fn mock_snapshots(&self, entries: &[(&str, f64, f64)]) {
        let mut body = serde_json::Map::new();
        for (symbol, price, previous) in entries {
            body.insert(
                (*symbol).to_string(),
                json!({
                    "latestTrade": {"p": price},
                    "prevDailyBar": {"c": previous}
                }),
            );
        }
        Mock::given(method("GET"))
            .and(path("/v2/stocks/snapshots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Value::Object(body)))
            .mount(&self.server)
            .await;
    }

    /// Respond with a server error
    pub async fn mock_server_error(&self) {
        Mock::given(method("GET"))
            .and(path("/v2/stocks/snapshots"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "upstream down"})),
            )
            .mount(&self.server)
            .await;
    }
}

/// Mock Yahoo Finance chart endpoint
pub struct MockYahoo {
    /// The underlying server
    pub server: MockServer,
}

impl MockYahoo {
    /// Start the mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL for adapter configuration
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Respond with one symbol's chart. Carets arrive percent-encoded.
    pub async fn mock_chart(&self, symbol: &str, price: f64, previous: f64) {
        let encoded = symbol.replace('^', "%5E");
        Mock::given(method("GET"))
            .and(path(format!("/v8/finance/chart/{encoded}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chart": {
                    "result": [{"meta": {
                        "regularMarketPrice": price,
                        "chartPreviousClose": previous
                    }}],
                    "error": null
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Respond with an empty chart for one symbol
    pub async fn mock_missing(&self, symbol: &str) {
        let encoded = symbol.replace('^', "%5E");
        Mock::given(method("GET"))
            .and(path(format!("/v8/finance/chart/{encoded}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chart": {"result": [], "error": {"code": "Not Found"}}
            })))
            .mount(&self.server)
            .await;
    }
}

/// Mock FRED observations API
pub struct MockFred {
    /// The underlying server
    pub server: MockServer,
}

impl MockFred {
    /// Start the mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL for adapter configuration
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Respond with a series' observations, newest first
    pub async fn mock_series(&self, series_id: &str, values: &[&str]) {
        let observations: Vec<Value> = values
            .iter()
            .enumerate()
            .map(|(i, value)| json!({"date": format!("2024-{:02}-01", 12 - i.min(11)), "value": value}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/fred/series/observations"))
            .and(wiremock::matchers::query_param("series_id", series_id))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"observations": observations})),
            )
            .mount(&self.server)
            .await;
    }
}

/// Mock Finnhub API
pub struct MockFinnhub {
    /// The underlying server
    pub server: MockServer,
}

impl MockFinnhub {
    /// Start the mock server
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL for adapter configuration
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mount one endpoint with a fixed JSON body
    pub async fn mock_endpoint(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount every endpoint the signals report touches
    pub async fn mock_signals_fixture(&self) {
        self.mock_endpoint(
            "/stock/profile2",
            json!({"name": "Apple Inc", "finnhubIndustry": "Technology"}),
        )
        .await;
        self.mock_endpoint("/quote", json!({"c": 100.0, "d": 1.0, "dp": 1.0}))
            .await;
        self.mock_endpoint(
            "/stock/recommendation",
            json!([{
                "buy": 16, "strongBuy": 4, "hold": 8, "sell": 2, "strongSell": 0,
                "period": "2024-05-01"
            }]),
        )
        .await;
        self.mock_endpoint(
            "/stock/price-target",
            json!({"targetMean": 120.0, "targetHigh": 150.0, "targetLow": 90.0}),
        )
        .await;
        self.mock_endpoint(
            "/company-news",
            json!([{
                "headline": "Apple ships a thing",
                "source": "Newswire",
                "datetime": 1_717_200_000_i64,
                "url": "https://news.example/apple"
            }]),
        )
        .await;
        self.mock_endpoint(
            "/calendar/earnings",
            json!({"earningsCalendar": [{"date": "2099-01-15"}]}),
        )
        .await;
        self.mock_endpoint(
            "/stock/earnings",
            json!([{
                "period": "2024-03-31", "surprise": 0.05, "surprisePercent": 3.2,
                "actual": 1.55, "estimate": 1.50
            }]),
        )
        .await;
        self.mock_endpoint(
            "/stock/insider-transactions",
            json!({"data": [
                {"name": "An Exec", "transactionType": "P", "share": 1000.0,
                 "value": 150000.0, "transactionDate": "2024-05-20"}
            ]}),
        )
        .await;
    }
}
