//! Driving a model through a condition.

use crate::record::{ExperimentResult, ItemRecord, ResultMetadata};
use chrono::Utc;
use std::fmt;
use vacuum_provider::Model;
use vacuum_score::{ResponseParser, ScoreMode, score};
use vacuum_stimuli::{Condition, SequenceExample, format_prompt};

/// Where a run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Condition received, nothing asked yet.
    Setup,
    /// Asking about item `item` (1-based) of `total`.
    Iterating {
        /// Current item.
        item: usize,
        /// Items in the condition.
        total: usize,
    },
    /// All items answered; computing accuracy.
    Aggregating,
    /// Result built.
    Done,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => f.write_str("setup"),
            Self::Iterating { item, total } => write!(f, "iterating {item}/{total}"),
            Self::Aggregating => f.write_str("aggregating"),
            Self::Done => f.write_str("done"),
        }
    }
}

/// Presents every test item of a condition to a model and scores the answers.
///
/// Items are asked strictly one at a time, in the condition's order. A
/// completion that failed is recorded as a wrong answer with score 0 and the
/// run continues, so a result always holds one record per test item.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    parser: ResponseParser,
    mode: ScoreMode,
}

impl Runner {
    /// A runner that parses with `parser` and scores strictly.
    pub fn new(parser: ResponseParser) -> Self {
        Self {
            parser,
            mode: ScoreMode::Strict,
        }
    }

    /// Score with `mode` instead.
    #[must_use]
    pub fn with_mode(mut self, mode: ScoreMode) -> Self {
        self.mode = mode;
        self
    }

    /// The scoring mode.
    pub fn mode(&self) -> ScoreMode {
        self.mode
    }

    /// Run `model` over the test set of `condition`.
    pub async fn run(&self, model: &dyn Model, condition: &Condition) -> ExperimentResult {
        let total = condition.test.len();
        tracing::info!(
            model = model.name(),
            experiment = condition.label(),
            phase = %RunPhase::Setup,
            n_training = condition.training.len(),
            n_test = total,
            "starting run"
        );

        let mut responses = Vec::with_capacity(total);
        for (index, item) in condition.test.iter().enumerate() {
            let phase = RunPhase::Iterating {
                item: index + 1,
                total,
            };
            let record = self.ask(model, &condition.training, item, index + 1).await;
            tracing::debug!(
                model = model.name(),
                phase = %phase,
                correct = record.correct,
                failed = record.error.is_some(),
                "item scored"
            );
            responses.push(record);
        }

        tracing::info!(model = model.name(), phase = %RunPhase::Aggregating, "aggregating");
        let n_correct = responses.iter().filter(|r| r.correct).count();
        let accuracy = if total == 0 {
            0.0
        } else {
            n_correct as f64 / total as f64
        };

        let result = ExperimentResult {
            model_name: model.name().to_string(),
            experiment_type: condition.label().to_string(),
            accuracy,
            n_correct,
            n_total: total,
            responses,
            metadata: ResultMetadata {
                n_training_examples: condition.training.len(),
                sequence_length: condition.metadata.sequence_length,
                transformation: condition.metadata.transformation.clone(),
                seed: condition.metadata.seed,
                chance_level: condition.chance_level(),
                score_mode: self.mode,
                model_stats: model.stats(),
                condition: condition.metadata.clone(),
            },
            timestamp: Utc::now(),
        };

        tracing::info!(
            model = %result.model_name,
            experiment = %result.experiment_type,
            phase = %RunPhase::Done,
            n_correct,
            n_total = total,
            accuracy,
            failed_items = result.failed_items(),
            "run complete"
        );
        result
    }

    async fn ask(
        &self,
        model: &dyn Model,
        training: &[SequenceExample],
        item: &SequenceExample,
        item_number: usize,
    ) -> ItemRecord {
        let prompt = format_prompt(training, &item.input_sequence);
        let completion = model.complete(&prompt).await;

        let (parsed, verdict) = if completion.success {
            let parsed = self.parser.parse(&completion.text, item.expected_length());
            let verdict = score(&parsed.tokens, &item.output_sequence, self.mode);
            (parsed, verdict)
        } else {
            let parsed = self.parser.parse("", item.expected_length());
            let verdict = score::<&str, _>(&[], &item.output_sequence, self.mode);
            (parsed, verdict)
        };

        ItemRecord {
            item_number,
            input: item.input_sequence.clone(),
            expected_output: item.output_sequence.clone(),
            model_output_raw: completion.text,
            model_output_parsed: parsed.tokens,
            correct: verdict.correct,
            score: verdict.score,
            parse_outcome: parsed.outcome,
            error: completion.error,
            metadata: item.metadata.clone(),
            model_metadata: completion.metadata,
        }
    }
}
