//! [`SequenceExample`]: one input/output pair.

use crate::transform::Transformation;
use serde::{Deserialize, Serialize};
use std::fmt;
use vacuum_symbols::{Symbol, join_symbols};

/// Whether a rule-transfer test item repeats the trained rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    /// Same rule as training, unseen symbols.
    Control,
    /// A rule never shown in training.
    Transfer,
}

impl TestType {
    /// Lowercase name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Transfer => "transfer",
        }
    }
}

/// Per-item tags used for breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleMetadata {
    /// Control or transfer item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<TestType>,
    /// Rule selected by a marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Transformation>,
    /// Marker appended to the input.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Symbol>,
    /// Sequence length, for length-scaling items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

impl ExampleMetadata {
    /// Whether no tag is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// An input sequence and the output the transformation produces from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceExample {
    /// What the model sees.
    pub input_sequence: Vec<Symbol>,
    /// The correct answer.
    pub output_sequence: Vec<Symbol>,
    /// Rule that maps input to output.
    pub transformation: Transformation,
    /// Optional tags.
    #[serde(default, skip_serializing_if = "ExampleMetadata::is_empty")]
    pub metadata: ExampleMetadata,
}

impl SequenceExample {
    /// Apply `transformation` to `input`.
    pub fn new(input: Vec<Symbol>, transformation: Transformation) -> Self {
        let output_sequence = transformation.apply(&input);
        Self {
            input_sequence: input,
            output_sequence,
            transformation,
            metadata: ExampleMetadata::default(),
        }
    }

    /// Apply `transformation` to `input`, then append `marker` to the shown
    /// input. The output never carries the marker.
    pub fn marked(input: Vec<Symbol>, marker: Symbol, transformation: Transformation) -> Self {
        let mut example = Self::new(input, transformation);
        example.input_sequence.push(marker);
        example.metadata.rule = Some(transformation);
        example.metadata.marker = Some(marker);
        example
    }

    /// Replace the tags.
    #[must_use]
    pub fn with_metadata(mut self, metadata: ExampleMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Number of symbols the answer must contain.
    pub fn expected_length(&self) -> usize {
        self.output_sequence.len()
    }
}

impl fmt::Display for SequenceExample {
    /// `A B C → B C A`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            join_symbols(&self.input_sequence),
            join_symbols(&self.output_sequence)
        )
    }
}
