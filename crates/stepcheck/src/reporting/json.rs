//! JSON writer for evaluation outcomes.
//!
//! Status labels are lowercase and values keep their JSON shape, so
//! downstream tools can diff reports between runs.

use std::io::Write;

use serde::Serialize;

use super::{Tally, status_label};
use crate::evaluator::EvaluationOutcome;
use crate::value::RawValue;

#[derive(Serialize)]
struct JsonReport<'a> {
    checks: Vec<JsonCheck<'a>>,
    passed: usize,
    failed: usize,
}

#[derive(Serialize)]
struct JsonCheck<'a> {
    path: &'a str,
    origin: &'static str,
    operator: &'static str,
    status: &'static str,
    actual: RawValue,
    expected: RawValue,
    strategy: String,
    case_sensitive: bool,
    ordered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    occurrence: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

impl<'a> From<&'a EvaluationOutcome> for JsonCheck<'a> {
    fn from(outcome: &'a EvaluationOutcome) -> Self {
        let spec = outcome.spec();
        Self {
            path: outcome.path().path(),
            origin: outcome.path().origin().as_str(),
            operator: outcome.operator().as_token(),
            status: status_label(outcome),
            actual: outcome.actual().to_json(),
            expected: spec.expected().to_json(),
            strategy: spec.strategy().tag().to_string(),
            case_sensitive: spec.case_sensitive(),
            ordered: spec.ordered(),
            occurrence: spec.occurrence(),
            message: outcome.message(),
        }
    }
}

impl<'a> From<&'a [EvaluationOutcome]> for JsonReport<'a> {
    fn from(outcomes: &'a [EvaluationOutcome]) -> Self {
        let tally = Tally::of(outcomes);
        Self {
            checks: outcomes.iter().map(JsonCheck::from).collect(),
            passed: tally.passed,
            failed: tally.failed,
        }
    }
}

/// Serialize `outcomes` into the supplied writer.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stepcheck::{Evaluator, Mode, RawMatchSpec, TypedPath};
/// use stepcheck::reporting::json;
///
/// let outcome = Evaluator::default()
///     .evaluate(Mode::Report, &TypedPath::parse("a"), &json!(2), ">", &RawMatchSpec::from("1"))
///     .unwrap();
/// let mut buffer = Vec::new();
/// json::write_outcomes(&mut buffer, &[outcome]).unwrap();
/// let text = String::from_utf8(buffer).unwrap();
/// assert!(text.contains("\"status\":\"passed\""));
/// ```
///
/// # Errors
///
/// Returns an error when serialization or writing fails.
pub fn write_outcomes<W: Write>(
    writer: &mut W,
    outcomes: &[EvaluationOutcome],
) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(outcomes))
}

/// Produce a JSON string for `outcomes`.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn to_string(outcomes: &[EvaluationOutcome]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(outcomes))
}
