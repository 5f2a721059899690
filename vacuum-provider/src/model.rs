//! The object-safe completion interface the run orchestrator consumes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Per-call bookkeeping attached to a [`Completion`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionMetadata {
    /// Model that answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Wall-clock time of the successful attempt, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_seconds: Option<f64>,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Prompt tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<usize>,
    /// Completion tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<usize>,
    /// Prompt plus completion tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<usize>,
    /// Provider's stop or finish reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// The outcome of asking a model for a completion.
///
/// Failure is data, not an error: a request that exhausted its retries
/// comes back with `success == false` and an empty `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Raw model output.
    pub text: String,
    /// Whether a response was obtained.
    pub success: bool,
    /// Why no response was obtained.
    pub error: Option<String>,
    /// Bookkeeping.
    pub metadata: CompletionMetadata,
}

impl Completion {
    /// A successful completion.
    pub fn ok(text: impl Into<String>, metadata: CompletionMetadata) -> Self {
        Self {
            text: text.into(),
            success: true,
            error: None,
            metadata,
        }
    }

    /// A failed completion.
    pub fn failed(error: impl Into<String>, metadata: CompletionMetadata) -> Self {
        Self {
            text: String::new(),
            success: false,
            error: Some(error.into()),
            metadata,
        }
    }
}

/// Usage counters for one model over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Model identifier.
    pub model_name: String,
    /// Completions requested.
    pub total_requests: u64,
    /// Completions that exhausted their retries.
    pub failed_requests: u64,
    /// `(total - failed) / total`, or 0.0 before any request.
    pub success_rate: f64,
    /// Tokens reported by the provider.
    pub total_tokens: u64,
}

/// A model the orchestrator can drive.
///
/// Object-safe via `#[async_trait]`, so a run can hold
/// `Vec<Box<dyn Model>>` across providers.
#[async_trait]
pub trait Model: Send + Sync {
    /// Identifier used in results and file names.
    fn name(&self) -> &str;

    /// Ask for a completion of `prompt`. Never fails; see [`Completion`].
    async fn complete(&self, prompt: &str) -> Completion;

    /// Usage so far.
    fn stats(&self) -> UsageStats;
}
