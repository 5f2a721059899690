//! Errors raised while building conditions.

use thiserror::Error;
use vacuum_symbols::SymbolError;

/// Errors from condition construction.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StimulusError {
    /// Symbol allocation failed.
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// A count or length was zero, or parameters contradict each other.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A transformation name did not parse.
    #[error("unknown transformation: {0}")]
    UnknownTransformation(String),

    /// A condition name or label did not parse.
    #[error("unknown condition: {0}")]
    UnknownCondition(String),
}

impl StimulusError {
    /// Shorthand for [`StimulusError::InvalidParameters`].
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameters(msg.into())
    }
}
