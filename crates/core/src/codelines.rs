//! Codeline normalization and filtering.

use crate::types::Codeline;
use std::collections::BTreeSet;

/// Split raw text into non-blank codelines numbered 1..=n by position among the
/// surviving lines. Blank and whitespace-only lines are dropped before numbering.
pub fn normalize(raw_text: &str) -> Vec<Codeline> {
    raw_text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| Codeline::new(i + 1, line))
        .collect()
}

/// Keep the codelines whose number is not in `remove`, in order, without renumbering.
pub fn filter(lines: &[Codeline], remove: &BTreeSet<usize>) -> Vec<Codeline> {
    lines.iter().filter(|line| !remove.contains(&line.line_number)).cloned().collect()
}

/// Join codeline texts back into file text.
pub fn join(lines: &[Codeline]) -> String {
    lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n")
}
