//! Exact-match and partial-credit scoring.

use serde::{Deserialize, Serialize};

/// How strictly a prediction is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Whole sequence must match: 1.0 or 0.0.
    #[default]
    Strict,
    /// Fraction of matching positions when lengths agree.
    Partial,
}

/// The verdict for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Whether the item counts as correct.
    pub correct: bool,
    /// Credit in `[0, 1]`.
    pub score: f64,
    /// Whether prediction and expectation are identical.
    pub exact_match: bool,
    /// What was predicted.
    pub predicted: Vec<String>,
    /// What was expected.
    pub expected: Vec<String>,
}

/// Score `predicted` against `expected`.
///
/// Under [`ScoreMode::Partial`] a length mismatch scores 0.0. In both modes
/// an item is correct only when its score is 1.0.
pub fn score<P, E>(predicted: &[P], expected: &[E], mode: ScoreMode) -> Score
where
    P: AsRef<str>,
    E: ToString,
{
    let predicted: Vec<String> = predicted.iter().map(|p| p.as_ref().to_string()).collect();
    let expected: Vec<String> = expected.iter().map(ToString::to_string).collect();
    let exact_match = predicted == expected;

    let score = match mode {
        ScoreMode::Strict => {
            if exact_match {
                1.0
            } else {
                0.0
            }
        }
        ScoreMode::Partial => {
            if predicted.len() != expected.len() || expected.is_empty() {
                if exact_match { 1.0 } else { 0.0 }
            } else {
                let matches = predicted.iter().zip(&expected).filter(|(p, e)| p == e).count();
                matches as f64 / expected.len() as f64
            }
        }
    };

    Score {
        correct: score == 1.0,
        score,
        exact_match,
        predicted,
        expected,
    }
}
