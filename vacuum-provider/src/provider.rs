//! The [`Provider`] trait for LLM backends.
//!
//! [`Provider`] uses RPITIT and is not object-safe. The object-safe
//! boundary is [`Model`](crate::Model), which
//! [`RetryingModel<P>`](crate::RetryingModel) implements for any provider.

use crate::error::ProviderError;
use crate::types::{CompletionRequest, CompletionResponse};
use std::future::Future;

/// LLM provider interface.
///
/// Each backend (Anthropic, OpenAI, Gemini) implements this trait. A
/// provider makes exactly one HTTP call per `complete`; retrying is the
/// caller's business.
pub trait Provider: Send + Sync {
    /// Send a completion request to the provider.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, ProviderError>> + Send;
}
