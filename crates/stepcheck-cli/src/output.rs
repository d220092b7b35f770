//! Helpers for rendering command output.

use std::io::Write;

use clap::ValueEnum;
use eyre::{Context, Result};
use stepcheck::reporting::{json, write_summary};
use stepcheck::{ComparisonOperator, EvaluationOutcome, StrategyTag};

/// Output format for evaluation outcomes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// One line per check followed by a tally.
    #[default]
    Text,
    /// A single JSON report.
    Json,
}

pub(crate) fn write_outcomes<W: Write>(
    writer: &mut W,
    format: Format,
    outcomes: &[EvaluationOutcome],
) -> Result<()> {
    match format {
        Format::Text => write_summary(writer, outcomes).wrap_err("failed to write check summary"),
        Format::Json => {
            json::write_outcomes(writer, outcomes)
                .wrap_err("failed to serialize outcomes to JSON")?;
            writeln!(writer).wrap_err("failed to terminate JSON output with newline")
        }
    }
}

pub(crate) fn write_verdict<W: Write>(writer: &mut W, holds: bool) -> Result<()> {
    writeln!(writer, "{holds}").wrap_err("failed to write verdict")
}

pub(crate) fn write_operators<W: Write>(
    writer: &mut W,
    tokens: &[(String, ComparisonOperator)],
) -> Result<()> {
    tokens.iter().try_for_each(|(token, operator)| {
        writeln!(writer, "{token} -> {operator}")
            .wrap_err_with(|| format!("failed to write operator token '{token}'"))
    })
}

pub(crate) fn write_strategies<W: Write>(
    writer: &mut W,
    names: &[(String, StrategyTag)],
) -> Result<()> {
    names.iter().try_for_each(|(name, tag)| {
        writeln!(writer, "{name} -> {tag}")
            .wrap_err_with(|| format!("failed to write strategy name '{name}'"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stepcheck::{Evaluator, Mode, RawMatchSpec, TypedPath};

    fn outcome(actual: &serde_json::Value) -> EvaluationOutcome {
        Evaluator::default()
            .evaluate(
                Mode::Report,
                &TypedPath::parse("count"),
                actual,
                ">",
                &RawMatchSpec::from("3"),
            )
            .unwrap_or_else(|err| panic!("{err}"))
    }

    #[test]
    fn json_output_is_newline_terminated() -> Result<()> {
        let mut buffer = Vec::new();
        write_outcomes(&mut buffer, Format::Json, &[outcome(&json!(4))])?;
        let text = String::from_utf8(buffer)?;
        assert!(text.ends_with("}\n"));
        let report: serde_json::Value = serde_json::from_str(text.trim_end())?;
        assert_eq!(report.get("passed"), Some(&json!(1)));
        Ok(())
    }

    #[test]
    fn text_output_lists_each_check() -> Result<()> {
        let mut buffer = Vec::new();
        write_outcomes(
            &mut buffer,
            Format::Text,
            &[outcome(&json!(4)), outcome(&json!(2))],
        )?;
        let text = String::from_utf8(buffer)?;
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.first().is_some_and(|line| line.starts_with("[passed]")));
        assert!(lines.get(1).is_some_and(|line| line.starts_with("[failed]")));
        assert_eq!(lines.get(2), Some(&"2 check(s): 1 passed, 1 failed"));
        Ok(())
    }

    #[test]
    fn operator_listing_shows_canonical_form() -> Result<()> {
        let mut buffer = Vec::new();
        write_operators(
            &mut buffer,
            &[(String::from("notequals"), ComparisonOperator::NotEquals)],
        )?;
        assert_eq!(
            String::from_utf8(buffer)?,
            format!("notequals -> {}\n", ComparisonOperator::NotEquals)
        );
        Ok(())
    }
}
