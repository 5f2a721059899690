//! The [`Symbol`] token.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An atomic, printable token: one Unicode scalar value.
///
/// Serializes as a one-character JSON string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(char);

impl Symbol {
    /// Wrap a character.
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    /// The underlying character.
    pub const fn as_char(self) -> char {
        self.0
    }

    /// The Unicode code point.
    pub const fn code_point(self) -> u32 {
        self.0 as u32
    }

    /// `U+XXXX` notation, as used in audit reports.
    pub fn code_point_label(self) -> String {
        format!("U+{:04X}", self.code_point())
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Join symbols with single spaces.
pub fn join_symbols(symbols: &[Symbol]) -> String {
    symbols
        .iter()
        .map(Symbol::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
