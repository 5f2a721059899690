//! Integration tests for the OpenAI provider using wiremock.

use vacuum_provider::{CompletionRequest, Provider, ProviderError};
use vacuum_provider_openai::OpenAi;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn success_response_body() -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-abc123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4-0613",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "The answer is ⨁ ⨂ ⨀" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 25, "completion_tokens": 9, "total_tokens": 34 }
    })
}

#[tokio::test]
async fn complete_sends_bearer_auth_and_prompt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("OpenAI-Organization", "org-1"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4",
            "messages": [{ "role": "user", "content": "⨀ ⨁ ⨂ →" }],
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_response_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenAi::new("test-key")
        .organization("org-1")
        .base_url(mock_server.uri());
    let request = CompletionRequest {
        temperature: Some(0.0),
        ..CompletionRequest::new("⨀ ⨁ ⨂ →")
    };
    let resp = provider.complete(request).await.unwrap();

    assert_eq!(resp.text, "The answer is ⨁ ⨂ ⨀");
    assert_eq!(resp.usage.input_tokens, 25);
    assert_eq!(resp.usage.output_tokens, 9);
}

#[tokio::test]
async fn complete_returns_rate_limit_error_on_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "message": "Rate limit reached", "type": "requests" }
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenAi::new("key").base_url(mock_server.uri());
    let err = provider.complete(CompletionRequest::new("p")).await.unwrap_err();

    assert!(matches!(err, ProviderError::RateLimit(_)), "got: {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn complete_returns_authentication_error_on_403() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let provider = OpenAi::new("key").base_url(mock_server.uri());
    let err = provider.complete(CompletionRequest::new("p")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Authentication(ref m) if m == "forbidden"));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_invalid_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let provider = OpenAi::new("key").base_url(mock_server.uri());
    let err = provider.complete(CompletionRequest::new("p")).await.unwrap_err();

    assert!(matches!(err, ProviderError::InvalidRequest(ref m) if m.contains("invalid JSON")));
}
