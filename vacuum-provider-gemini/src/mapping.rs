//! Request/response mapping for the Gemini `generateContent` API.
//!
//! Reference: <https://ai.google.dev/api/generate-content>

use vacuum_provider::{CompletionRequest, CompletionResponse, ProviderError, TokenUsage};

/// Convert a [`CompletionRequest`] into the `generateContent` JSON body.
///
/// The model is not part of the body; it goes in the URL.
#[must_use]
pub fn to_api_request(req: &CompletionRequest) -> serde_json::Value {
    let mut generation_config = serde_json::json!({ "maxOutputTokens": req.max_tokens });
    if let Some(temp) = req.temperature {
        generation_config["temperature"] = serde_json::Value::from(temp);
    }

    serde_json::json!({
        "contents": [{ "role": "user", "parts": [{ "text": req.prompt }] }],
        "generationConfig": generation_config,
    })
}

/// Parse a `generateContent` response body, reading the first candidate.
///
/// `model` is the model the request was sent to; it is used when the
/// response carries no `modelVersion`.
pub fn from_api_response(body: &serde_json::Value, model: &str) -> Result<CompletionResponse, ProviderError> {
    let candidate = body["candidates"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| {
            let reason = body["promptFeedback"]["blockReason"].as_str().unwrap_or("none");
            ProviderError::InvalidRequest(format!("no candidates in response (block reason: {reason})"))
        })?;

    let text = candidate["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default();

    let usage = &body["usageMetadata"];
    Ok(CompletionResponse {
        id: body["responseId"].as_str().map(str::to_string),
        model: body["modelVersion"].as_str().unwrap_or(model).to_string(),
        text,
        usage: TokenUsage {
            input_tokens: usage["promptTokenCount"].as_u64().unwrap_or(0) as usize,
            output_tokens: usage["candidatesTokenCount"].as_u64().unwrap_or(0) as usize,
        },
        stop_reason: candidate["finishReason"].as_str().map(str::to_string),
    })
}
