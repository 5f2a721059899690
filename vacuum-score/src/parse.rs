//! Extracting a candidate answer from free-form text.

use serde::{Deserialize, Serialize};
use unicode_general_category::{GeneralCategory, get_general_category};
use vacuum_symbols::PoolConfig;

/// How the answer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseOutcome {
    /// At least the expected number of symbol tokens; the last ones were kept.
    Complete,
    /// Some symbol tokens, fewer than expected.
    UnderLength,
    /// No symbol tokens; the leading raw tokens were kept.
    Fallback,
}

impl ParseOutcome {
    /// Whether the parse is certain to be the wrong length or kind.
    pub fn is_ambiguous(&self) -> bool {
        !matches!(self, Self::Complete)
    }
}

/// The tokens extracted from one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResponse {
    /// Candidate answer, in order.
    pub tokens: Vec<String>,
    /// Which rule produced `tokens`.
    pub outcome: ParseOutcome,
}

/// Finds symbol sequences in model output.
///
/// A token counts as a symbol when it is a single character that either
/// falls inside one of the configured ranges or has a Unicode symbol
/// category (`Sm`, `Sc`, `Sk`, `So`).
#[derive(Debug, Clone, Default)]
pub struct ResponseParser {
    ranges: PoolConfig,
}

impl ResponseParser {
    /// Use `ranges` as the designated ranges.
    pub fn new(ranges: PoolConfig) -> Self {
        Self { ranges }
    }

    /// Whether `token` is a lone symbol character.
    pub fn is_symbol_token(&self, token: &str) -> bool {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.ranges.contains(c) || is_symbol_category(c),
            _ => false,
        }
    }

    /// Extract up to `expected_len` tokens from `text`.
    ///
    /// ```
    /// use vacuum_score::{ParseOutcome, ResponseParser};
    ///
    /// let parsed = ResponseParser::default().parse("The answer is: ⨀ ⨁ ⨂", 3);
    /// assert_eq!(parsed.tokens, ["⨀", "⨁", "⨂"]);
    /// assert_eq!(parsed.outcome, ParseOutcome::Complete);
    /// ```
    pub fn parse(&self, text: &str, expected_len: usize) -> ParsedResponse {
        let cleaned = text
            .trim()
            .replace('→', " ")
            .replace("->", " ")
            .replace(',', " ");
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        let symbols: Vec<&str> = tokens
            .iter()
            .copied()
            .filter(|t| self.is_symbol_token(t))
            .collect();

        let (kept, outcome) = if symbols.len() >= expected_len && !symbols.is_empty() {
            (&symbols[symbols.len() - expected_len..], ParseOutcome::Complete)
        } else if !symbols.is_empty() {
            (&symbols[..], ParseOutcome::UnderLength)
        } else {
            (&tokens[..tokens.len().min(expected_len)], ParseOutcome::Fallback)
        };

        if outcome.is_ambiguous() {
            tracing::debug!(
                ?outcome,
                found = symbols.len(),
                expected_len,
                "response did not contain a full symbol sequence"
            );
        }
        ParsedResponse {
            tokens: kept.iter().map(|t| (*t).to_string()).collect(),
            outcome,
        }
    }
}

fn is_symbol_category(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
    )
}
