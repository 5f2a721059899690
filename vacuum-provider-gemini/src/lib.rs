//! Google Gemini provider.
//!
//! [`Gemini`] implements [`vacuum_provider::Provider`] against the
//! Generative Language API's `models/{model}:generateContent` endpoint.

pub mod client;
pub(crate) mod error;
pub mod mapping;

pub use client::Gemini;

pub use vacuum_provider::ProviderError;
