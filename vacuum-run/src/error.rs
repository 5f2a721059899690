//! Error types for persistence and analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or writing stored records.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// A filesystem operation failed.
    #[error("i/o error at {}: {source}", .path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No record exists at the path.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}

/// Errors from significance tests given impossible inputs.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// More successes than trials.
    #[error("{successes} successes out of {trials} trials")]
    SuccessesExceedTrials {
        /// Successes given.
        successes: u64,
        /// Trials given.
        trials: u64,
    },

    /// A probability outside `[0, 1]`.
    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    /// A comparison over an empty result.
    #[error("no items to analyze")]
    Empty,
}
