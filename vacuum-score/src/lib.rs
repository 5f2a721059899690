#![deny(missing_docs)]
//! Response parsing and scoring.
//!
//! [`ResponseParser`] pulls a candidate sequence of the expected length out
//! of whatever the model said; [`score`] judges it against the expected
//! output.

pub mod parse;
pub mod score;

pub use parse::{ParseOutcome, ParsedResponse, ResponseParser};
pub use score::{Score, ScoreMode, score};
