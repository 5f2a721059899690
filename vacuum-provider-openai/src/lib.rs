//! OpenAI Chat Completions provider.
//!
//! [`OpenAi`] implements [`vacuum_provider::Provider`] with a single
//! `POST /v1/chat/completions` per request. Any server speaking the same
//! protocol works through [`OpenAi::base_url`].

pub mod client;
pub(crate) mod error;
pub mod mapping;

pub use client::OpenAi;

pub use vacuum_provider::ProviderError;
