//! End-to-end tests for the completion gateway.

use crate::helpers::{assert_status, empty_config, TestServer};
use crate::mock_providers::{MockAnthropic, MockOpenAi};
use fuse_providers::{AnthropicConfig, GoogleConfig, OpenAiConfig};
use fuse_server::AppState;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;

fn secret() -> Option<SecretString> {
    Some(SecretString::new("test-key".into()))
}

fn chat_request() -> serde_json::Value {
    json!({
        "messages": [{"role": "user", "content": "hi"}],
        "max_tokens": 50
    })
}

async fn server(anthropic: AnthropicConfig, openai: OpenAiConfig) -> TestServer {
    let state = AppState::builder(empty_config())
        .anthropic(anthropic)
        .openai(openai)
        .google(GoogleConfig::new(None))
        .build()
        .expect("state");
    TestServer::new(state)
}

#[tokio::test]
async fn falls_back_after_a_quota_rejection() {
    let anthropic = MockAnthropic::start().await;
    let openai = MockOpenAi::start().await;
    anthropic.mock_quota_error().await;
    openai.mock_success("hello").await;

    let server = server(
        AnthropicConfig::new(secret()).with_base_url(anthropic.uri()),
        OpenAiConfig::new(secret()).with_base_url(openai.uri()),
    )
    .await;

    let response = server.post_json("/api/completions", &chat_request()).await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["content"][0]["type"], "text");
    assert_eq!(body["content"][0]["text"], "hello");
    assert_eq!(body["provider"], "openai");
}

#[tokio::test]
async fn first_success_consults_no_lower_priority_backend() {
    let anthropic = MockAnthropic::start().await;
    let openai = MockOpenAi::start().await;
    anthropic.mock_success("first answer").await;
    openai.expect_no_calls().await;

    let server = server(
        AnthropicConfig::new(secret()).with_base_url(anthropic.uri()),
        OpenAiConfig::new(secret()).with_base_url(openai.uri()),
    )
    .await;

    let response = server.post_json("/api/completions", &chat_request()).await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["provider"], "anthropic");
    assert_eq!(body["content"][0]["text"], "first answer");
}

#[tokio::test]
async fn empty_content_falls_through_to_the_next_backend() {
    let anthropic = MockAnthropic::start().await;
    let openai = MockOpenAi::start().await;
    anthropic.mock_empty_content().await;
    openai.mock_success("rescued").await;

    let server = server(
        AnthropicConfig::new(secret()).with_base_url(anthropic.uri()),
        OpenAiConfig::new(secret()).with_base_url(openai.uri()),
    )
    .await;

    let response = server.post_json("/api/completions", &chat_request()).await;
    assert_status(&response, 200);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["provider"], "openai");
}

#[tokio::test]
async fn exhausted_chain_reports_every_backend() {
    let anthropic = MockAnthropic::start().await;
    let openai = MockOpenAi::start().await;
    anthropic.mock_quota_error().await;
    openai.mock_server_error().await;

    let server = server(
        AnthropicConfig::new(secret()).with_base_url(anthropic.uri()),
        OpenAiConfig::new(secret()).with_base_url(openai.uri()),
    )
    .await;

    let response = server.post_json("/api/completions", &chat_request()).await;
    assert_status(&response, 502);

    let body = TestServer::json_body(response).await;
    assert_eq!(body["error"], "all providers failed");
    assert_eq!(body["providers"]["anthropic"]["kind"], "upstream");
    assert!(body["providers"]["anthropic"]["detail"]
        .as_str()
        .expect("detail")
        .contains("quota exceeded"));
    assert_eq!(body["providers"]["openai"]["kind"], "upstream");
}

#[tokio::test]
async fn no_configured_backend_is_a_configuration_error() {
    let server = server(AnthropicConfig::new(None), OpenAiConfig::new(None)).await;

    let response = server.post_json("/api/completions", &chat_request()).await;
    assert_status(&response, 500);

    let body = TestServer::json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error")
        .contains("no provider configured"));
}

#[tokio::test]
async fn empty_message_list_is_rejected_before_any_call() {
    let anthropic = MockAnthropic::start().await;
    let server = server(
        AnthropicConfig::new(secret()).with_base_url(anthropic.uri()),
        OpenAiConfig::new(None),
    )
    .await;

    let response = server
        .post_json("/api/completions", &json!({"messages": []}))
        .await;
    assert_status(&response, 400);
}
