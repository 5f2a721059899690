#![deny(missing_docs)]
//! Driving models through conditions and keeping what they said.
//!
//! A [`Runner`] presents each test item of a
//! [`Condition`](vacuum_stimuli::Condition) to a [`Model`](vacuum_provider::Model),
//! parses and scores every answer and returns an [`ExperimentResult`]. A
//! [`ResultStore`] writes results and condition specifications as pretty
//! JSON, and [`analysis`] tests results against chance and against each
//! other.

pub mod analysis;
pub mod error;
pub mod record;
pub mod runner;
pub mod store;

pub use analysis::{
    Alternative, BreakdownKey, ChanceComparison, EffectSize, ModelComparison, Tally, binomial_test,
    breakdown, cohens_h, compare_models, compare_to_chance, fisher_exact, permutation_chance,
};
pub use error::{AnalysisError, StoreError};
pub use record::{ExperimentResult, ItemRecord, ResultMetadata};
pub use runner::{RunPhase, Runner};
pub use store::{ResultStore, StoredCondition, result_file_name};
