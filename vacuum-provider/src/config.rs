//! Sampling configuration and retry policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Static configuration for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl ModelConfig {
    /// Deterministic sampling with a short answer budget.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 150,
            temperature: 0.0,
        }
    }
}

/// How hard to try before giving up on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Attempts per request, including the first. At least 1.
    pub max_attempts: u32,
    /// Backoff base: the wait after attempt `i` (0-based) is `base_delay * 2^i`.
    pub base_delay: Duration,
    /// Pause before every request except a model's first.
    pub request_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            request_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// No waiting anywhere. Useful in tests.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            request_delay: Duration::ZERO,
        }
    }

    /// Backoff after the zero-based `attempt` failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}
