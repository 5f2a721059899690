//! [`ProviderError`] and its retry classification.

use std::time::Duration;

/// Errors from LLM provider calls.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    // Retryable errors
    /// Connection reset, DNS failure and the like.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// Rate limited by the provider.
    #[error("rate limited: {0}")]
    RateLimit(String),
    /// Request timed out.
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// Provider is overloaded or failing server-side.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    // Terminal errors
    /// Bad or missing API key.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// Malformed request, or a response that could not be understood.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Requested model does not exist.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Any other provider error.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Whether this error is likely transient and the request can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimit(_) | Self::Timeout(_) | Self::ServiceUnavailable(_)
        )
    }
}
