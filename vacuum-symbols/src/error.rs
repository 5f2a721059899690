//! Errors raised while configuring pools and allocating symbols.

use crate::symbol::Symbol;
use thiserror::Error;

/// Errors from symbol pool construction and allocation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// The request needs more unused symbols than the pool still holds.
    #[error("insufficient symbols: need {required}, have {available} available")]
    InsufficientSymbols {
        /// Symbols the request needs.
        required: usize,
        /// Unused symbols left in the eligible pool.
        available: usize,
    },

    /// Two sets returned by one allocation share symbols. This is a bug in
    /// the allocator, never a condition callers should recover from.
    #[error("disjointness violated: {} symbol(s) shared between sets", .overlap.len())]
    DisjointnessViolation {
        /// The shared symbols.
        overlap: Vec<Symbol>,
    },

    /// The pool configuration is unusable.
    #[error("invalid pool config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_symbols_display_carries_counts() {
        let err = SymbolError::InsufficientSymbols {
            required: 120,
            available: 100,
        };
        assert_eq!(
            err.to_string(),
            "insufficient symbols: need 120, have 100 available"
        );
    }

    #[test]
    fn disjointness_violation_display_counts_overlap() {
        let err = SymbolError::DisjointnessViolation {
            overlap: vec![Symbol::new('⨀'), Symbol::new('⨁')],
        };
        assert_eq!(
            err.to_string(),
            "disjointness violated: 2 symbol(s) shared between sets"
        );
    }
}
