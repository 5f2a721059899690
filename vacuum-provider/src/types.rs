//! Provider-level request and response types.

use serde::{Deserialize, Serialize};

/// A single-turn, text-only completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier. Empty means the provider's default.
    pub model: String,
    /// The user prompt.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

impl CompletionRequest {
    /// A request for `prompt` with the provider's default model.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: String::new(),
            prompt: prompt.into(),
            max_tokens: 150,
            temperature: None,
        }
    }
}

/// Token accounting for one response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt.
    pub input_tokens: usize,
    /// Tokens in the completion.
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Prompt plus completion.
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}

/// What a provider returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider's response id, when it sends one.
    pub id: Option<String>,
    /// Model that actually answered.
    pub model: String,
    /// Concatenated text output.
    pub text: String,
    /// Token accounting.
    pub usage: TokenUsage,
    /// Provider's stop or finish reason, verbatim.
    pub stop_reason: Option<String>,
}
