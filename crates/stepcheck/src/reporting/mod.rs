//! Rendering of evaluation outcomes for people and tools.
//!
//! The text writer prints one line per check followed by a tally. The JSON
//! writer emits the same data in a stable machine-readable shape.

use std::io::{self, Write};

use crate::evaluator::EvaluationOutcome;

/// JSON writer for evaluation outcomes.
pub mod json;

/// Pass/fail counts over a set of outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    /// Checks that passed.
    pub passed: usize,
    /// Checks that failed.
    pub failed: usize,
}

impl Tally {
    /// Count the outcomes.
    #[must_use]
    pub fn of(outcomes: &[EvaluationOutcome]) -> Self {
        let passed = outcomes.iter().filter(|outcome| outcome.passed()).count();
        Self {
            passed,
            failed: outcomes.len() - passed,
        }
    }

    /// Total number of checks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Lowercase status label for an outcome.
#[must_use]
pub const fn status_label(outcome: &EvaluationOutcome) -> &'static str {
    if outcome.passed() { "passed" } else { "failed" }
}

/// Write a human-readable summary of `outcomes`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stepcheck::{Evaluator, Mode, RawMatchSpec, TypedPath};
/// use stepcheck::reporting::write_summary;
///
/// let outcome = Evaluator::default()
///     .evaluate(Mode::Report, &TypedPath::parse("a"), &json!(1), "=", &RawMatchSpec::from("1"))
///     .unwrap();
/// let mut buffer = Vec::new();
/// write_summary(&mut buffer, &[outcome]).unwrap();
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.ends_with("1 check(s): 1 passed, 0 failed\n"));
/// ```
///
/// # Errors
///
/// Returns any error raised by the writer.
pub fn write_summary<W: Write>(writer: &mut W, outcomes: &[EvaluationOutcome]) -> io::Result<()> {
    for outcome in outcomes {
        writeln!(writer, "[{}] {outcome}", status_label(outcome))?;
    }
    let tally = Tally::of(outcomes);
    writeln!(
        writer,
        "{} check(s): {} passed, {} failed",
        tally.total(),
        tally.passed,
        tally.failed
    )
}
