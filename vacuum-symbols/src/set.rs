//! [`SymbolSet`]: an allocated batch of symbols with its provenance.

use crate::error::SymbolError;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// What an allocated set is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetRole {
    /// Symbols for training examples.
    Training,
    /// Symbols for held-out test items.
    Test,
    /// Familiar symbols for the structural control.
    Control,
}

/// Bookkeeping attached to a [`SymbolSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMetadata {
    /// Number of symbols, duplicates included.
    pub symbol_count: usize,
    /// Number of distinct symbols.
    pub unique_count: usize,
    /// Sequences the set is meant to fill.
    pub n_sequences: usize,
    /// Symbols per sequence.
    pub sequence_length: usize,
    /// Rule the sequences will demonstrate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_rule: Option<String>,
    /// Seed of the pool the set came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Kind of symbol, e.g. `familiar_letters`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_type: Option<String>,
    /// Why the set exists, e.g. `structural_control`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// An ordered batch of symbols tagged with its role and experiment.
///
/// Immutable once built; the `with_*` methods consume and return the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
    set_type: SetRole,
    experiment: String,
    metadata: SetMetadata,
}

impl SymbolSet {
    /// Wrap allocated symbols. Counts are derived from `symbols`.
    pub fn new(
        symbols: Vec<Symbol>,
        role: SetRole,
        experiment: impl Into<String>,
        n_sequences: usize,
        sequence_length: usize,
    ) -> Self {
        let unique_count = symbols.iter().collect::<HashSet<_>>().len();
        Self {
            metadata: SetMetadata {
                symbol_count: symbols.len(),
                unique_count,
                n_sequences,
                sequence_length,
                transformation_rule: None,
                seed: None,
                symbol_type: None,
                purpose: None,
            },
            symbols,
            set_type: role,
            experiment: experiment.into(),
        }
    }

    /// Record the rule the set will demonstrate.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.metadata.transformation_rule = Some(rule.into());
        self
    }

    /// Record the pool seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.metadata.seed = Some(seed);
        self
    }

    /// Record the kind of symbol and why the set exists.
    #[must_use]
    pub fn with_purpose(mut self, symbol_type: impl Into<String>, purpose: impl Into<String>) -> Self {
        self.metadata.symbol_type = Some(symbol_type.into());
        self.metadata.purpose = Some(purpose.into());
        self
    }

    /// The symbols, in allocation order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The set's role.
    pub fn role(&self) -> SetRole {
        self.set_type
    }

    /// Experiment label.
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Bookkeeping.
    pub fn metadata(&self) -> &SetMetadata {
        &self.metadata
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols present in both sets, sorted.
    pub fn overlap(&self, other: &SymbolSet) -> Vec<Symbol> {
        overlap(&self.symbols, &other.symbols)
    }

    /// Whether the two sets share no symbol.
    pub fn is_disjoint_from(&self, other: &SymbolSet) -> bool {
        self.overlap(other).is_empty()
    }
}

fn overlap(a: &[Symbol], b: &[Symbol]) -> Vec<Symbol> {
    let left: HashSet<&Symbol> = a.iter().collect();
    b.iter()
        .filter(|s| left.contains(s))
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Check that no symbol appears in more than one group.
///
/// Returns every shared symbol on failure. Duplicates inside a single
/// group are not this check's concern.
pub fn verify_disjoint(groups: &[&[Symbol]]) -> Result<(), SymbolError> {
    let mut shared = BTreeSet::new();
    for (i, a) in groups.iter().enumerate() {
        for b in &groups[i + 1..] {
            shared.extend(overlap(a, b));
        }
    }
    if shared.is_empty() {
        Ok(())
    } else {
        Err(SymbolError::DisjointnessViolation {
            overlap: shared.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syms(s: &str) -> Vec<Symbol> {
        s.chars().map(Symbol::new).collect()
    }

    #[test]
    fn new_derives_counts() {
        let set = SymbolSet::new(syms("ABCA"), SetRole::Control, "control", 2, 2);
        assert_eq!(set.metadata().symbol_count, 4);
        assert_eq!(set.metadata().unique_count, 3);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn serializes_with_set_type_and_optional_fields() {
        let set = SymbolSet::new(syms("⨀⨁⨂"), SetRole::Training, "1_sequential", 1, 3)
            .with_rule("rotate_left")
            .with_seed(42);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["set_type"], "training");
        assert_eq!(json["symbols"][0], "⨀");
        assert_eq!(json["metadata"]["transformation_rule"], "rotate_left");
        assert_eq!(json["metadata"]["seed"], 42);
        assert!(json["metadata"].get("purpose").is_none());
    }

    #[test]
    fn overlap_is_sorted_and_deduplicated() {
        let a = SymbolSet::new(syms("CBA"), SetRole::Training, "x", 1, 3);
        let b = SymbolSet::new(syms("AABD"), SetRole::Test, "x", 1, 4);
        assert_eq!(a.overlap(&b), syms("AB"));
        assert!(!a.is_disjoint_from(&b));
    }

    #[test]
    fn verify_disjoint_reports_every_shared_symbol() {
        let a = syms("ABC");
        let b = syms("DEF");
        let c = syms("AF");
        assert!(verify_disjoint(&[a.as_slice(), b.as_slice()]).is_ok());
        let err = verify_disjoint(&[a.as_slice(), b.as_slice(), c.as_slice()]).unwrap_err();
        assert_eq!(
            err,
            SymbolError::DisjointnessViolation {
                overlap: syms("AF")
            }
        );
    }
}
