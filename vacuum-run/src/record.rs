//! Result records written once per (model, condition) run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vacuum_provider::{CompletionMetadata, UsageStats};
use vacuum_score::{ParseOutcome, ScoreMode};
use vacuum_stimuli::{ConditionMetadata, ExampleMetadata};
use vacuum_symbols::Symbol;

/// One test item as it was presented, answered and scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Position in presentation order, starting at 1.
    pub item_number: usize,
    /// Input shown to the model, marker included.
    pub input: Vec<Symbol>,
    /// Correct answer.
    pub expected_output: Vec<Symbol>,
    /// Text the model returned; empty when the request failed.
    pub model_output_raw: String,
    /// Tokens the parser extracted.
    pub model_output_parsed: Vec<String>,
    /// Whether the item was judged correct.
    pub correct: bool,
    /// Credit in `[0, 1]`.
    pub score: f64,
    /// How the parser arrived at `model_output_parsed`.
    pub parse_outcome: ParseOutcome,
    /// Why no response was obtained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The item's tags: test type, rule, marker, length.
    #[serde(default, skip_serializing_if = "ExampleMetadata::is_empty")]
    pub metadata: ExampleMetadata,
    /// Latency, attempts and tokens of the completion.
    pub model_metadata: CompletionMetadata,
}

/// Run-level bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Examples shown in each prompt.
    pub n_training_examples: usize,
    /// Training sequence length.
    pub sequence_length: usize,
    /// Rule demonstrated in training.
    pub transformation: String,
    /// Seed the condition was built with.
    pub seed: u64,
    /// Accuracy expected from guessing.
    pub chance_level: f64,
    /// Scoring mode used.
    pub score_mode: ScoreMode,
    /// Model usage at the end of the run.
    pub model_stats: UsageStats,
    /// Everything the condition recorded about itself.
    pub condition: ConditionMetadata,
}

/// The outcome of driving one model through one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Model identifier.
    pub model_name: String,
    /// Condition label, e.g. `1c_ambiguity`.
    pub experiment_type: String,
    /// `n_correct / n_total`, 0.0 when there were no items.
    pub accuracy: f64,
    /// Items judged correct.
    pub n_correct: usize,
    /// Items presented.
    pub n_total: usize,
    /// Per-item records in presentation order.
    pub responses: Vec<ItemRecord>,
    /// Bookkeeping.
    pub metadata: ResultMetadata,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
}

impl ExperimentResult {
    /// Items whose completion failed.
    pub fn failed_items(&self) -> usize {
        self.responses.iter().filter(|r| r.error.is_some()).count()
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "{} on {}: {}/{} correct ({:.1}%, chance {:.1}%)",
            self.model_name,
            self.experiment_type,
            self.n_correct,
            self.n_total,
            self.accuracy * 100.0,
            self.metadata.chance_level * 100.0
        )
    }
}
