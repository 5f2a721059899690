#![deny(missing_docs)]
//! Sequence transformations and experimental conditions.
//!
//! A [`StimulusGenerator`] owns a seeded [`SymbolPool`](vacuum_symbols::SymbolPool)
//! and builds [`Condition`]s: a training set and a test set of
//! [`SequenceExample`]s whose symbols never overlap. The same seed always
//! yields the same condition, down to the order of test items.
//!
//! | Kind | Label | Shape |
//! |------|-------|-------|
//! | `plain` | `1_sequential` | rotate left by one, 20 training, 20 test |
//! | `minimal` | `1b_minimal` | plain with 3 training |
//! | `ambiguous` | `1c_ambiguity` | `★` rotates, `◆` reverses |
//! | `length_scaling` | `1d_scaling` | train at length 3, test at 3, 4 and 5 |
//! | `rule_transfer` | `1e_transfer` | train rotate by one, test by one and two |
//! | `familiar_control` | `control` | plain over `A`–`Z` |

pub mod condition;
pub mod config;
pub mod error;
pub mod example;
pub mod generator;
pub mod prompt;
pub mod transform;

pub use condition::{Condition, ConditionKind, ConditionMetadata, ConditionSpec, LengthCount};
pub use config::{
    AmbiguousParams, ExperimentConfig, MarkedRule, PlainParams, ScalingParams, TransferParams,
};
pub use error::StimulusError;
pub use example::{ExampleMetadata, SequenceExample, TestType};
pub use generator::StimulusGenerator;
pub use prompt::format_prompt;
pub use transform::Transformation;
