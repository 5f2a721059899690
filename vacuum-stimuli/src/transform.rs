//! Pure sequence transformations.
//!
//! Every function here is total: empty input gives empty output and the
//! input is never mutated.

use crate::error::StimulusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rotate left by `n` positions, reduced modulo the length.
///
/// Reduction is Euclidean, so a negative `n` rotates right.
///
/// ```
/// use vacuum_stimuli::transform::rotate_left;
/// assert_eq!(rotate_left(&['A', 'B', 'C'], 1), vec!['B', 'C', 'A']);
/// assert_eq!(rotate_left(&['A', 'B', 'C'], -1), vec!['C', 'A', 'B']);
/// ```
pub fn rotate_left<T: Clone>(seq: &[T], n: isize) -> Vec<T> {
    if seq.is_empty() {
        return Vec::new();
    }
    let len = seq.len() as isize;
    let k = n.rem_euclid(len) as usize;
    let mut out = Vec::with_capacity(seq.len());
    out.extend_from_slice(&seq[k..]);
    out.extend_from_slice(&seq[..k]);
    out
}

/// Rotate right by `n` positions.
pub fn rotate_right<T: Clone>(seq: &[T], n: isize) -> Vec<T> {
    rotate_left(seq, n.wrapping_neg())
}

/// Elements in opposite order.
pub fn reverse<T: Clone>(seq: &[T]) -> Vec<T> {
    seq.iter().rev().cloned().collect()
}

/// Exchange the first and last elements. Shorter than two is unchanged.
pub fn swap_first_last<T: Clone>(seq: &[T]) -> Vec<T> {
    let mut out = seq.to_vec();
    if out.len() >= 2 {
        let last = out.len() - 1;
        out.swap(0, last);
    }
    out
}

/// A copy of the input.
pub fn identity<T: Clone>(seq: &[T]) -> Vec<T> {
    seq.to_vec()
}

/// A named transformation.
///
/// Names are stable and appear in stored conditions and results:
/// `rotate_left`, `rotate_left_2`, `rotate_right`, `reverse`, `swap`,
/// `identity`. Rotations by other amounts use the `_<n>` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Transformation {
    /// Rotate left by the given amount.
    RotateLeft(usize),
    /// Rotate right by the given amount.
    RotateRight(usize),
    /// Reverse the sequence.
    Reverse,
    /// Swap first and last.
    SwapFirstLast,
    /// Leave the sequence alone.
    Identity,
}

impl Transformation {
    /// Apply to a sequence.
    pub fn apply<T: Clone>(&self, seq: &[T]) -> Vec<T> {
        match *self {
            Self::RotateLeft(n) => rotate_left(seq, n as isize),
            Self::RotateRight(n) => rotate_right(seq, n as isize),
            Self::Reverse => reverse(seq),
            Self::SwapFirstLast => swap_first_last(seq),
            Self::Identity => identity(seq),
        }
    }

    /// The stable name.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RotateLeft(1) => f.write_str("rotate_left"),
            Self::RotateLeft(n) => write!(f, "rotate_left_{n}"),
            Self::RotateRight(1) => f.write_str("rotate_right"),
            Self::RotateRight(n) => write!(f, "rotate_right_{n}"),
            Self::Reverse => f.write_str("reverse"),
            Self::SwapFirstLast => f.write_str("swap"),
            Self::Identity => f.write_str("identity"),
        }
    }
}

impl FromStr for Transformation {
    type Err = StimulusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || StimulusError::UnknownTransformation(s.to_string());
        let amount = |rest: &str| rest.parse::<usize>().map_err(|_| unknown());
        match s {
            "rotate_left" => Ok(Self::RotateLeft(1)),
            "rotate_right" => Ok(Self::RotateRight(1)),
            "reverse" => Ok(Self::Reverse),
            "swap" => Ok(Self::SwapFirstLast),
            "identity" => Ok(Self::Identity),
            _ => {
                if let Some(rest) = s.strip_prefix("rotate_left_") {
                    Ok(Self::RotateLeft(amount(rest)?))
                } else if let Some(rest) = s.strip_prefix("rotate_right_") {
                    Ok(Self::RotateRight(amount(rest)?))
                } else {
                    Err(unknown())
                }
            }
        }
    }
}

impl From<Transformation> for String {
    fn from(t: Transformation) -> Self {
        t.to_string()
    }
}

impl TryFrom<String> for Transformation {
    type Error = StimulusError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
