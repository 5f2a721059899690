#![deny(missing_docs)]
//! # vacuum
//!
//! Do language models induce rules, or match surface patterns they have
//! seen? vacuum builds sequence-transformation tasks from symbols with no
//! meaningful co-occurrence in ordinary text, keeps training and test
//! symbols disjoint, asks models to complete them and tests the accuracy
//! against chance.
//!
//! This crate re-exports the workspace behind one import surface, holds the
//! environment-driven [`HarnessConfig`](config::HarnessConfig), and with the
//! `cli` feature ships the `vacuum` binary.

pub mod config;
#[cfg(feature = "providers-all")]
pub mod models;

pub use vacuum_provider;
#[cfg(feature = "provider-anthropic")]
pub use vacuum_provider_anthropic;
#[cfg(feature = "provider-gemini")]
pub use vacuum_provider_gemini;
#[cfg(feature = "provider-openai")]
pub use vacuum_provider_openai;
pub use vacuum_run;
pub use vacuum_score;
pub use vacuum_stimuli;
pub use vacuum_symbols;

/// Happy-path imports for building conditions and running models.
pub mod prelude {
    pub use crate::config::{ConfigError, HarnessConfig};

    #[cfg(feature = "providers-all")]
    pub use crate::models::{ProviderKind, build_model};

    pub use vacuum_symbols::{PoolConfig, Symbol, SymbolError, SymbolPool, SymbolRange};

    pub use vacuum_stimuli::{
        Condition, ConditionKind, ExperimentConfig, SequenceExample, StimulusError,
        StimulusGenerator, Transformation, format_prompt,
    };

    pub use vacuum_score::{ResponseParser, ScoreMode, score};

    pub use vacuum_provider::{Completion, Model, Provider, ProviderError, RetryPolicy, RetryingModel};

    pub use vacuum_run::{Alternative, ExperimentResult, ResultStore, Runner, compare_to_chance};

    #[cfg(feature = "provider-anthropic")]
    pub use vacuum_provider_anthropic::Anthropic;

    #[cfg(feature = "provider-openai")]
    pub use vacuum_provider_openai::OpenAi;

    #[cfg(feature = "provider-gemini")]
    pub use vacuum_provider_gemini::Gemini;
}
