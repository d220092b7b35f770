//! Fail-fast evaluation of ordered check rows.

use std::borrow::Borrow;

use crate::error::BatchError;
use crate::evaluator::{EvaluationOutcome, Evaluator, Mode};
use crate::source::ValueSource;
use crate::spec::RawMatchSpec;
use crate::value::{RawValue, TypedPath};

/// One `(path, operator, expected)` row of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRow {
    path: TypedPath,
    operator: String,
    spec: RawMatchSpec,
}

impl CheckRow {
    /// Build a row.
    #[must_use]
    pub fn new(path: TypedPath, operator: impl Into<String>, spec: RawMatchSpec) -> Self {
        Self {
            path,
            operator: operator.into(),
            spec,
        }
    }

    /// Path of the actual value.
    #[must_use]
    pub fn path(&self) -> &TypedPath {
        &self.path
    }

    /// Operator token as written.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Unparsed expected-value specification.
    #[must_use]
    pub fn spec(&self) -> &RawMatchSpec {
        &self.spec
    }
}

/// Applies an [`Evaluator`] in raise-mode to each row in order, stopping at
/// the first failure.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stepcheck::{BatchEvaluator, CheckRow, RawMatchSpec, TypedPath};
///
/// let document = json!({"status": "Paid", "total": 12});
/// let rows = [
///     CheckRow::new(TypedPath::parse("status"), "=", RawMatchSpec::from("Paid")),
///     CheckRow::new(TypedPath::parse("total"), ">", RawMatchSpec::from("20")),
/// ];
/// let err = BatchEvaluator::default().run(&document, &rows).unwrap_err();
/// assert_eq!(err.row, 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchEvaluator {
    evaluator: Evaluator,
}

impl BatchEvaluator {
    /// Batch runner around `evaluator`.
    #[must_use]
    pub const fn new(evaluator: Evaluator) -> Self {
        Self { evaluator }
    }

    /// Evaluate `rows` against `source`, returning every outcome when all
    /// rows pass.
    ///
    /// # Errors
    ///
    /// Returns a [`BatchError`] for the first row that fails, whether through
    /// a data mismatch or a configuration error. Later rows are not read.
    pub fn run<S, I>(&self, source: &S, rows: I) -> Result<Vec<EvaluationOutcome>, BatchError>
    where
        S: ValueSource + ?Sized,
        I: IntoIterator,
        I::Item: Borrow<CheckRow>,
    {
        let mut outcomes = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            let row = row.borrow();
            let actual = source.value_at(row.path().path()).unwrap_or(RawValue::Null);
            let outcome = self
                .evaluator
                .evaluate(Mode::Raise, row.path(), &actual, row.operator(), row.spec())
                .map_err(|err| {
                    log::debug!("batch stopped at check {}", index + 1);
                    BatchError {
                        row: index + 1,
                        path: row.path().path().to_string(),
                        source: err,
                    }
                })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use serde_json::json;

    struct CountingSource {
        document: RawValue,
        reads: RefCell<Vec<String>>,
    }

    impl ValueSource for CountingSource {
        fn value_at(&self, path: &str) -> Option<RawValue> {
            self.reads.borrow_mut().push(path.to_string());
            self.document.value_at(path)
        }
    }

    fn row(path: &str, operator: &str, spec: &str) -> CheckRow {
        CheckRow::new(TypedPath::parse(path), operator, RawMatchSpec::from(spec))
    }

    #[test]
    fn stops_at_first_failing_row() {
        let source = CountingSource {
            document: json!({"a": 1, "b": 2, "c": 3}),
            reads: RefCell::new(Vec::new()),
        };
        let rows = vec![row("a", "=", "1"), row("b", "=", "5"), row("c", "=", "3")];
        let Err(err) = BatchEvaluator::default().run(&source, &rows) else {
            panic!("row 2 should fail");
        };
        assert_eq!(err.row, 2);
        assert_eq!(err.path, "b");
        assert!(!err.source.is_config());
        assert_eq!(*source.reads.borrow(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn config_error_in_a_row_stops_the_batch() {
        let rows = [row("a", "=", "1"), row("a", "~", "1")];
        let Err(err) = BatchEvaluator::default().run(&json!({"a": 1}), rows) else {
            panic!("unknown operator should fail");
        };
        assert_eq!(err.row, 2);
        assert!(err.source.is_config());
    }

    #[test]
    fn returns_every_outcome_when_all_pass() {
        let rows = [row("a", "=", "1"), row("missing", "not-present", "")];
        let outcomes = BatchEvaluator::default()
            .run(&json!({"a": 1}), rows.iter())
            .unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(EvaluationOutcome::passed));
    }
}
