//! Prompt rendering.

use crate::example::SequenceExample;
use vacuum_symbols::{Symbol, join_symbols};

/// Render training examples and one test input as a prompt.
///
/// One `input → output` line per training example, a blank line, then the
/// test input followed by ` →`. No instructions are added.
pub fn format_prompt(training: &[SequenceExample], test_input: &[Symbol]) -> String {
    let lines: Vec<String> = training.iter().map(SequenceExample::to_string).collect();
    format!("{}\n\n{} →", lines.join("\n"), join_symbols(test_input))
}
