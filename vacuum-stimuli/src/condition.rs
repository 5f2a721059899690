//! Conditions: named training/test groupings.

use crate::error::StimulusError;
use crate::example::SequenceExample;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use vacuum_symbols::NoveltyReport;

/// The experimental variants the generator can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Fixed length, rotate left by one.
    Plain,
    /// Plain with very few training examples.
    Minimal,
    /// Two marker-keyed rules.
    Ambiguous,
    /// Test lengths differ from the training length.
    LengthScaling,
    /// Test mixes the trained rule with an unseen one.
    RuleTransfer,
    /// Plain built from familiar letters.
    FamiliarControl,
}

impl ConditionKind {
    /// Every kind, in run order.
    pub const ALL: [ConditionKind; 6] = [
        Self::Plain,
        Self::Minimal,
        Self::Ambiguous,
        Self::LengthScaling,
        Self::RuleTransfer,
        Self::FamiliarControl,
    ];

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Minimal => "minimal",
            Self::Ambiguous => "ambiguous",
            Self::LengthScaling => "length_scaling",
            Self::RuleTransfer => "rule_transfer",
            Self::FamiliarControl => "familiar_control",
        }
    }

    /// Experiment label written into stored records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Plain => "1_sequential",
            Self::Minimal => "1b_minimal",
            Self::Ambiguous => "1c_ambiguity",
            Self::LengthScaling => "1d_scaling",
            Self::RuleTransfer => "1e_transfer",
            Self::FamiliarControl => "control",
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConditionKind {
    type Err = StimulusError;

    /// Accepts either the short name or the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == s || k.label() == s)
            .ok_or_else(|| StimulusError::UnknownCondition(s.to_string()))
    }
}

/// How many test items of one length a length-scaling condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthCount {
    /// Symbols per sequence.
    pub length: usize,
    /// Items of that length.
    pub count: usize,
}

impl LengthCount {
    /// Pair a length with a count.
    pub const fn new(length: usize, count: usize) -> Self {
        Self { length, count }
    }
}

/// Condition-level bookkeeping, stored alongside the examples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionMetadata {
    /// Experiment label.
    pub experiment: String,
    /// Seed the condition was built with.
    pub seed: u64,
    /// Rule demonstrated in training; `ambiguous` when several are.
    pub transformation: String,
    /// Marker to rule name, for marker-keyed conditions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, String>,
    /// Training examples.
    pub n_training: usize,
    /// Test items.
    pub n_test: usize,
    /// Training sequence length.
    pub sequence_length: usize,
    /// Per-length test counts, for length scaling.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_lengths: Vec<LengthCount>,
    /// Training examples per rule, for marker-keyed conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_per_rule: Option<usize>,
    /// Control items, for rule transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_control: Option<usize>,
    /// Transfer items, for rule transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_transfer: Option<usize>,
    /// Kind of symbol used, when not the novel pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_type: Option<String>,
    /// Provenance audit of every stimulus symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novelty: Option<NoveltyReport>,
}

/// A training set and a test set built together from one pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Which variant this is.
    pub kind: ConditionKind,
    /// Examples shown in every prompt.
    pub training: Vec<SequenceExample>,
    /// Items the model is asked to complete, in presentation order.
    pub test: Vec<SequenceExample>,
    /// Bookkeeping.
    pub metadata: ConditionMetadata,
}

/// The stored form of a [`Condition`]: `{training, test, metadata}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ConditionSpec<'a> {
    /// Training examples.
    pub training: &'a [SequenceExample],
    /// Test items.
    pub test: &'a [SequenceExample],
    /// Bookkeeping.
    pub metadata: &'a ConditionMetadata,
}

impl Condition {
    /// Experiment label.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    /// The specification record for audit.
    pub fn spec(&self) -> ConditionSpec<'_> {
        ConditionSpec {
            training: &self.training,
            test: &self.test,
            metadata: &self.metadata,
        }
    }

    /// Accuracy expected from guessing, averaged over test items.
    ///
    /// A guess among two marker-keyed rules is right half the time. Any other
    /// item is a permutation of its input, right once in `L!`.
    pub fn chance_level(&self) -> f64 {
        if self.test.is_empty() {
            return 0.0;
        }
        let total: f64 = self
            .test
            .iter()
            .map(|item| match self.kind {
                ConditionKind::Ambiguous => 1.0 / self.metadata.rules.len().max(1) as f64,
                _ => 1.0 / factorial(item.expected_length()),
            })
            .sum();
        total / self.test.len() as f64
    }
}

fn factorial(n: usize) -> f64 {
    (1..=n).map(|k| k as f64).product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_name_or_label() {
        for kind in ConditionKind::ALL {
            assert_eq!(kind.name().parse::<ConditionKind>().unwrap(), kind);
            assert_eq!(kind.label().parse::<ConditionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "exp9".parse::<ConditionKind>(),
            Err(StimulusError::UnknownCondition(_))
        ));
    }

    #[test]
    fn factorial_of_small_lengths() {
        assert_eq!(factorial(0), 1.0);
        assert_eq!(factorial(3), 6.0);
        assert_eq!(factorial(5), 120.0);
    }
}
