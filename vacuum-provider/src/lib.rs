#![deny(missing_docs)]
//! Provider plumbing for vacuum.
//!
//! Two layers, split the same way as the rest of the stack:
//!
//! - [`Provider`]: one HTTP round trip per call, generic and not
//!   object-safe. Implemented by the `vacuum-provider-*` crates.
//! - [`Model`]: the object-safe `complete(prompt) -> Completion` interface
//!   the run orchestrator drives. [`RetryingModel`] adapts any provider,
//!   applying a [`RetryPolicy`] and counting usage.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod retrying;
pub mod types;

pub use config::{ModelConfig, RetryPolicy};
pub use error::ProviderError;
pub use model::{Completion, CompletionMetadata, Model, UsageStats};
pub use provider::Provider;
pub use retrying::RetryingModel;
pub use types::{CompletionRequest, CompletionResponse, TokenUsage};
