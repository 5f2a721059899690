//! Request/response mapping for the OpenAI Chat Completions API.
//!
//! Reference: <https://platform.openai.com/docs/api-reference/chat/create>

use vacuum_provider::{CompletionRequest, CompletionResponse, ProviderError, TokenUsage};

/// Convert a [`CompletionRequest`] into the Chat Completions JSON body.
#[must_use]
pub fn to_api_request(req: &CompletionRequest, default_model: &str) -> serde_json::Value {
    let model = if req.model.is_empty() {
        default_model
    } else {
        req.model.as_str()
    };

    let mut body = serde_json::json!({
        "model": model,
        "messages": [{ "role": "user", "content": req.prompt }],
        "max_tokens": req.max_tokens,
    });

    if let Some(temp) = req.temperature {
        body["temperature"] = serde_json::Value::from(temp);
    }

    body
}

/// Parse a Chat Completions response body, reading the first choice.
pub fn from_api_response(body: &serde_json::Value) -> Result<CompletionResponse, ProviderError> {
    let model = body["model"]
        .as_str()
        .ok_or_else(|| ProviderError::InvalidRequest("missing 'model' in response".into()))?
        .to_string();

    let choice = body["choices"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| ProviderError::InvalidRequest("missing 'choices' array in response".into()))?;

    // content is null when the model refuses or only calls tools
    let text = choice["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    Ok(CompletionResponse {
        id: body["id"].as_str().map(str::to_string),
        model,
        text,
        usage: TokenUsage {
            input_tokens: body["usage"]["prompt_tokens"].as_u64().unwrap_or(0) as usize,
            output_tokens: body["usage"]["completion_tokens"].as_u64().unwrap_or(0) as usize,
        },
        stop_reason: choice["finish_reason"].as_str().map(str::to_string),
    })
}
