//! Parameters for every condition shape.

use crate::condition::LengthCount;
use crate::error::StimulusError;
use crate::transform::Transformation;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use vacuum_symbols::{PoolConfig, Symbol};

/// Sizes for the plain, minimal and familiar-control conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainParams {
    /// Training examples.
    pub n_training: usize,
    /// Test items.
    pub n_test: usize,
    /// Symbols per sequence.
    pub sequence_length: usize,
}

impl Default for PlainParams {
    fn default() -> Self {
        Self {
            n_training: 20,
            n_test: 20,
            sequence_length: 3,
        }
    }
}

impl PlainParams {
    /// Three training examples, twenty test items.
    pub fn minimal() -> Self {
        Self {
            n_training: 3,
            ..Self::default()
        }
    }

    /// Symbols the condition consumes.
    pub fn required_symbols(&self) -> usize {
        (self.n_training + self.n_test) * self.sequence_length
    }

    pub(crate) fn validate(&self) -> Result<(), StimulusError> {
        nonzero("n_training", self.n_training)?;
        nonzero("n_test", self.n_test)?;
        nonzero("sequence_length", self.sequence_length)
    }
}

/// A marker symbol and the rule it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedRule {
    /// Appended to the input.
    pub marker: Symbol,
    /// Applied to the marker-free input.
    pub rule: Transformation,
}

/// Parameters for the ambiguous-rule condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousParams {
    /// Rules in interleaving order.
    pub rules: Vec<MarkedRule>,
    /// Training examples per rule.
    pub n_training_per_rule: usize,
    /// Test items per rule.
    pub n_test_per_rule: usize,
    /// Symbols per sequence, marker excluded.
    pub sequence_length: usize,
}

impl Default for AmbiguousParams {
    /// `★` rotates left by one, `◆` reverses.
    fn default() -> Self {
        Self {
            rules: vec![
                MarkedRule {
                    marker: Symbol::new('★'),
                    rule: Transformation::RotateLeft(1),
                },
                MarkedRule {
                    marker: Symbol::new('◆'),
                    rule: Transformation::Reverse,
                },
            ],
            n_training_per_rule: 3,
            n_test_per_rule: 10,
            sequence_length: 3,
        }
    }
}

impl AmbiguousParams {
    /// Symbols the condition consumes, markers excluded.
    pub fn required_symbols(&self) -> usize {
        self.rules.len() * (self.n_training_per_rule + self.n_test_per_rule) * self.sequence_length
    }

    pub(crate) fn validate(&self) -> Result<(), StimulusError> {
        if self.rules.len() < 2 {
            return Err(StimulusError::invalid("ambiguous condition needs at least two rules"));
        }
        let mut markers = HashSet::new();
        if !self.rules.iter().all(|r| markers.insert(r.marker)) {
            return Err(StimulusError::invalid("markers must be distinct"));
        }
        nonzero("n_training_per_rule", self.n_training_per_rule)?;
        nonzero("n_test_per_rule", self.n_test_per_rule)?;
        nonzero("sequence_length", self.sequence_length)
    }
}

/// Parameters for the length-scaling condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingParams {
    /// Training examples.
    pub n_training: usize,
    /// Training sequence length.
    pub training_length: usize,
    /// Test items per length, in generation order.
    pub test_lengths: Vec<LengthCount>,
}

impl Default for ScalingParams {
    /// Training 3 × length 3; test 6 × 3, 7 × 4, 7 × 5.
    fn default() -> Self {
        Self {
            n_training: 3,
            training_length: 3,
            test_lengths: vec![
                LengthCount::new(3, 6),
                LengthCount::new(4, 7),
                LengthCount::new(5, 7),
            ],
        }
    }
}

impl ScalingParams {
    /// Total test items.
    pub fn n_test(&self) -> usize {
        self.test_lengths.iter().map(|lc| lc.count).sum()
    }

    /// Symbols the condition consumes.
    pub fn required_symbols(&self) -> usize {
        self.n_training * self.training_length
            + self
                .test_lengths
                .iter()
                .map(|lc| lc.length * lc.count)
                .sum::<usize>()
    }

    pub(crate) fn validate(&self) -> Result<(), StimulusError> {
        nonzero("n_training", self.n_training)?;
        nonzero("training_length", self.training_length)?;
        if self.test_lengths.is_empty() {
            return Err(StimulusError::invalid("test_lengths must not be empty"));
        }
        for lc in &self.test_lengths {
            nonzero("test length", lc.length)?;
            nonzero("test count", lc.count)?;
        }
        Ok(())
    }
}

/// Parameters for the rule-transfer condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferParams {
    /// Training examples, all using `trained`.
    pub n_training: usize,
    /// Held-out items using `trained`.
    pub n_control: usize,
    /// Items using `transfer`.
    pub n_transfer: usize,
    /// Symbols per sequence.
    pub sequence_length: usize,
    /// Rule shown in training.
    pub trained: Transformation,
    /// Rule only seen at test time.
    pub transfer: Transformation,
}

impl Default for TransferParams {
    fn default() -> Self {
        Self {
            n_training: 3,
            n_control: 10,
            n_transfer: 10,
            sequence_length: 3,
            trained: Transformation::RotateLeft(1),
            transfer: Transformation::RotateLeft(2),
        }
    }
}

impl TransferParams {
    /// Symbols the condition consumes.
    pub fn required_symbols(&self) -> usize {
        (self.n_training + self.n_control + self.n_transfer) * self.sequence_length
    }

    pub(crate) fn validate(&self) -> Result<(), StimulusError> {
        nonzero("n_training", self.n_training)?;
        nonzero("n_control", self.n_control)?;
        nonzero("n_transfer", self.n_transfer)?;
        nonzero("sequence_length", self.sequence_length)?;
        if self.trained == self.transfer {
            return Err(StimulusError::invalid("transfer rule must differ from the trained rule"));
        }
        Ok(())
    }
}

/// Everything needed to build every condition of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Seed for pools and orderings.
    pub seed: u64,
    /// Symbol ranges.
    pub pool: PoolConfig,
    /// Plain condition.
    pub plain: PlainParams,
    /// Minimal-training condition.
    pub minimal: PlainParams,
    /// Ambiguous-rule condition.
    pub ambiguous: AmbiguousParams,
    /// Length-scaling condition.
    pub scaling: ScalingParams,
    /// Rule-transfer condition.
    pub transfer: TransferParams,
    /// Familiar-letter control.
    pub familiar: PlainParams,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            pool: PoolConfig::default(),
            plain: PlainParams::default(),
            minimal: PlainParams::minimal(),
            ambiguous: AmbiguousParams::default(),
            scaling: ScalingParams::default(),
            transfer: TransferParams::default(),
            familiar: PlainParams::default(),
        }
    }
}

impl ExperimentConfig {
    /// Check every parameter block and the pool, once.
    pub fn validate(&self) -> Result<(), StimulusError> {
        self.pool.validate()?;
        self.plain.validate()?;
        self.minimal.validate()?;
        self.ambiguous.validate()?;
        self.scaling.validate()?;
        self.transfer.validate()?;
        self.familiar.validate()
    }
}

fn nonzero(field: &str, value: usize) -> Result<(), StimulusError> {
    if value == 0 {
        return Err(StimulusError::invalid(format!("{field} must be at least 1")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_requirements() {
        assert_eq!(PlainParams::default().required_symbols(), 120);
        assert_eq!(PlainParams::minimal().required_symbols(), 69);
        assert_eq!(AmbiguousParams::default().required_symbols(), 78);
        assert_eq!(ScalingParams::default().n_test(), 20);
        assert_eq!(ScalingParams::default().required_symbols(), 9 + 81);
        assert_eq!(TransferParams::default().required_symbols(), 69);
    }

    #[test]
    fn defaults_validate() {
        assert!(ExperimentConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_counts_are_rejected() {
        let params = PlainParams {
            n_test: 0,
            ..PlainParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(StimulusError::InvalidParameters(m)) if m.contains("n_test")
        ));

        let scaling = ScalingParams {
            test_lengths: vec![LengthCount::new(0, 3)],
            ..ScalingParams::default()
        };
        assert!(scaling.validate().is_err());
    }

    #[test]
    fn ambiguous_rejects_repeated_markers() {
        let mut params = AmbiguousParams::default();
        params.rules[1].marker = params.rules[0].marker;
        assert!(params.validate().is_err());
        params.rules.truncate(1);
        assert!(params.validate().is_err());
    }
}
