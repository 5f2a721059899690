//! Anthropic Messages API provider.
//!
//! [`Anthropic`] implements [`vacuum_provider::Provider`] with a single
//! non-streaming `POST /v1/messages` per request.

pub mod client;
pub(crate) mod error;
pub mod mapping;

pub use client::Anthropic;

pub use vacuum_provider::ProviderError;
