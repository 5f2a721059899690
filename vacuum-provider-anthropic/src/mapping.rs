//! Request/response mapping between vacuum-provider types and the Anthropic
//! Messages API format.
//!
//! Reference: <https://docs.anthropic.com/en/api/messages>

use vacuum_provider::{CompletionRequest, CompletionResponse, ProviderError, TokenUsage};

/// Convert a [`CompletionRequest`] into the Messages API JSON body.
///
/// The returned value does **not** include `"stream"`; callers add that key.
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

/// Parse a Messages API response body.
///
/// Text blocks are concatenated in order; other block types are skipped.
pub fn from_api_response(body: &serde_json::Value) -> Result<CompletionResponse, ProviderError> {
    let model = body["model"]
        .as_str()
        .ok_or_else(|| ProviderError::InvalidRequest("missing 'model' in response".into()))?
        .to_string();

    let content = body["content"]
        .as_array()
        .ok_or_else(|| ProviderError::InvalidRequest("missing 'content' array in response".into()))?;

    let text = content
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect::<String>();

    Ok(CompletionResponse {
        id: body["id"].as_str().map(str::to_string),
        model,
        text,
        usage: parse_usage(&body["usage"]),
        stop_reason: body["stop_reason"].as_str().map(str::to_string),
    })
}

fn parse_usage(usage: &serde_json::Value) -> TokenUsage {
    TokenUsage {
        input_tokens: usage["input_tokens"].as_u64().unwrap_or(0) as usize,
        output_tokens: usage["output_tokens"].as_u64().unwrap_or(0) as usize,
    }
}
