//! [`RetryingModel`]: a [`Provider`] behind the [`Model`] interface.

use crate::config::{ModelConfig, RetryPolicy};
use crate::model::{Completion, CompletionMetadata, Model, UsageStats};
use crate::provider::Provider;
use crate::types::CompletionRequest;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Wraps a provider with pacing, retries and usage counters.
///
/// Generic over `P: Provider` (not object-safe). `RetryingModel<P>`
/// implements the object-safe [`Model`] via `#[async_trait]`.
pub struct RetryingModel<P: Provider> {
    name: String,
    provider: P,
    config: ModelConfig,
    policy: RetryPolicy,
    total_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_tokens: AtomicU64,
}

impl<P: Provider> RetryingModel<P> {
    /// Wrap `provider`. The model name is `config.model`.
    pub fn new(provider: P, config: ModelConfig, policy: RetryPolicy) -> Self {
        Self {
            name: config.model.clone(),
            provider,
            config,
            policy,
            total_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            total_tokens: AtomicU64::new(0),
        }
    }

    /// Report under a different name than the model id.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn request(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
        }
    }
}

#[async_trait]
impl<P: Provider> Model for RetryingModel<P> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, prompt: &str) -> Completion {
        let previous = self.total_requests.fetch_add(1, Ordering::SeqCst);
        if previous > 0 && !self.policy.request_delay.is_zero() {
            tokio::time::sleep(self.policy.request_delay).await;
        }

        let max_attempts = self.policy.max_attempts.max(1);
        tracing::debug!(model = %self.name, prompt_chars = prompt.chars().count(), "requesting completion");

        let mut last_error = String::new();
        for attempt in 0..max_attempts {
            let started = Instant::now();
            match self.provider.complete(self.request(prompt)).await {
                Ok(response) => {
                    let latency = started.elapsed().as_secs_f64();
                    let tokens = response.usage.total();
                    self.total_tokens.fetch_add(tokens as u64, Ordering::SeqCst);
                    tracing::debug!(
                        model = %self.name,
                        attempt = attempt + 1,
                        latency_seconds = latency,
                        tokens,
                        "completion succeeded"
                    );
                    let metadata = CompletionMetadata {
                        model: Some(response.model),
                        latency_seconds: Some(latency),
                        attempts: attempt + 1,
                        prompt_tokens: Some(response.usage.input_tokens),
                        completion_tokens: Some(response.usage.output_tokens),
                        tokens_used: Some(tokens),
                        finish_reason: response.stop_reason,
                    };
                    return Completion::ok(response.text, metadata);
                }
                Err(err) => {
                    last_error = err.to_string();
                    let retryable = err.is_retryable();
                    tracing::warn!(
                        model = %self.name,
                        attempt = attempt + 1,
                        max_attempts,
                        retryable,
                        error = %err,
                        "completion attempt failed"
                    );
                    if !retryable {
                        self.failed_requests.fetch_add(1, Ordering::SeqCst);
                        return Completion::failed(
                            format!("attempt {} failed with a terminal error: {err}", attempt + 1),
                            CompletionMetadata {
                                attempts: attempt + 1,
                                ..CompletionMetadata::default()
                            },
                        );
                    }
                    if attempt + 1 < max_attempts {
                        tokio::time::sleep(self.policy.backoff(attempt)).await;
                    }
                }
            }
        }

        self.failed_requests.fetch_add(1, Ordering::SeqCst);
        let message = format!("all {max_attempts} attempts failed, last error: {last_error}");
        tracing::error!(model = %self.name, "{message}");
        Completion::failed(
            message,
            CompletionMetadata {
                attempts: max_attempts,
                ..CompletionMetadata::default()
            },
        )
    }

    fn stats(&self) -> UsageStats {
        let total = self.total_requests.load(Ordering::SeqCst);
        let failed = self.failed_requests.load(Ordering::SeqCst);
        UsageStats {
            model_name: self.name.clone(),
            total_requests: total,
            failed_requests: failed,
            success_rate: if total == 0 {
                0.0
            } else {
                (total - failed) as f64 / total as f64
            },
            total_tokens: self.total_tokens.load(Ordering::SeqCst),
        }
    }
}
