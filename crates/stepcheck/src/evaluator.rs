//! Single-check evaluation in raise-mode and report-mode.

use std::fmt;

use stepcheck_types::ComparisonOperator;

use crate::coercion::coerce;
use crate::compare::compare;
use crate::config::EvaluatorConfig;
use crate::error::EvaluationError;
use crate::registry::lookup_operator;
use crate::spec::{MatchSpec, RawMatchSpec};
use crate::value::{RawValue, TypedPath, TypedValue};

/// How a failed comparison is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// A data mismatch is returned as [`EvaluationError::Mismatch`].
    #[default]
    Raise,
    /// A data mismatch is returned as an outcome with `passed == false`.
    Report,
}

impl Mode {
    /// Map the `raise` flag used by step adapters onto a mode.
    #[must_use]
    pub const fn from_raise_flag(raise: bool) -> Self {
        if raise { Self::Raise } else { Self::Report }
    }
}

/// Decision for one check, produced fresh per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationOutcome {
    passed: bool,
    actual: TypedValue,
    spec: MatchSpec,
    operator: ComparisonOperator,
    path: TypedPath,
    message: Option<String>,
}

impl EvaluationOutcome {
    /// Whether the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// Actual value as typed before coercion.
    #[must_use]
    pub fn actual(&self) -> &TypedValue {
        &self.actual
    }

    /// Parsed expected-value specification.
    #[must_use]
    pub fn spec(&self) -> &MatchSpec {
        &self.spec
    }

    /// Operator that was applied.
    #[must_use]
    pub const fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// Path the actual value was read from.
    #[must_use]
    pub fn path(&self) -> &TypedPath {
        &self.path
    }

    /// Failure diagnostic; `None` when the check passed.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => write!(
                f,
                "{} '{}' passed {}",
                self.path.origin().noun(),
                self.path,
                describe(self.operator, &self.spec)
            ),
        }
    }
}

fn describe(operator: ComparisonOperator, spec: &MatchSpec) -> String {
    if operator.ignores_expected() {
        operator.as_token().to_string()
    } else {
        format!("{} {spec}", operator.as_token())
    }
}

/// Applies coercion, operator and strategy to decide a check.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stepcheck::{Evaluator, Mode, RawMatchSpec, TypedPath};
///
/// let evaluator = Evaluator::default();
/// let path = TypedPath::parse("order.total");
///
/// let outcome = evaluator
///     .evaluate(Mode::Report, &path, &json!(5), "=", &RawMatchSpec::from("5"))
///     .unwrap();
/// assert!(outcome.passed());
///
/// let failure = evaluator
///     .evaluate(Mode::Raise, &path, &json!(5), ">", &RawMatchSpec::from("7"))
///     .unwrap_err();
/// assert!(!failure.is_config());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Evaluator with explicit settings.
    #[must_use]
    pub const fn new(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Settings in effect.
    #[must_use]
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate one check.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Config`] for an unknown operator token or an
    /// invalid specification in either mode, and
    /// [`EvaluationError::Mismatch`] for a failed comparison in
    /// [`Mode::Raise`].
    pub fn evaluate(
        &self,
        mode: Mode,
        path: &TypedPath,
        actual: &RawValue,
        operator: &str,
        spec: &RawMatchSpec,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let operator = lookup_operator(operator)?;
        let spec = MatchSpec::parse(spec)?;
        self.evaluate_parsed(mode, path, actual, operator, &spec)
    }

    /// Evaluate one check whose operator and specification are already
    /// parsed.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Mismatch`] for a failed comparison in
    /// [`Mode::Raise`].
    pub fn evaluate_parsed(
        &self,
        mode: Mode,
        path: &TypedPath,
        actual: &RawValue,
        operator: ComparisonOperator,
        spec: &MatchSpec,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        let typed = TypedValue::from_raw(actual, path.hint());
        log::debug!(
            "evaluating {} '{path}' {}",
            path.origin().noun(),
            describe(operator, spec)
        );
        let textual = !operator.is_relational()
            && (spec.strategy().is_textual() || operator.is_membership());
        let (left, right) = coerce(typed.clone(), operator, spec.expected().clone(), textual);
        log::trace!("coerced operands: {left} / {right}");
        let verdict = compare(operator, &left, &right, spec, &self.config);
        let message = (!verdict.passed).then(|| {
            let mut text = format!(
                "{} '{path}': expected {}, actual {typed}",
                path.origin().noun(),
                describe(operator, spec)
            );
            if let Some(detail) = &verdict.detail {
                text.push_str(&format!(" ({detail})"));
            }
            text
        });
        let outcome = EvaluationOutcome {
            passed: verdict.passed,
            actual: typed,
            spec: spec.clone(),
            operator,
            path: path.clone(),
            message,
        };
        log::debug!("{} '{path}' passed: {}", path.origin().noun(), outcome.passed);
        match mode {
            Mode::Raise if !outcome.passed => Err(EvaluationError::Mismatch(Box::new(outcome))),
            Mode::Raise | Mode::Report => Ok(outcome),
        }
    }

    /// Raise-mode shorthand used by assertion steps.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub fn assert(
        &self,
        path: &TypedPath,
        actual: &RawValue,
        operator: &str,
        spec: &RawMatchSpec,
    ) -> Result<EvaluationOutcome, EvaluationError> {
        self.evaluate(Mode::Raise, path, actual, operator, spec)
    }

    /// Report-mode decision used by conditional steps.
    ///
    /// Any error, configuration errors included, collapses to `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use stepcheck::{Evaluator, RawMatchSpec, TypedPath};
    ///
    /// let evaluator = Evaluator::default();
    /// let path = TypedPath::parse("status");
    /// assert!(evaluator.check(&path, &json!("Paid"), "=", &RawMatchSpec::from("Paid")));
    /// assert!(!evaluator.check(&path, &json!("Paid"), "~", &RawMatchSpec::from("Paid")));
    /// ```
    #[must_use]
    pub fn check(
        &self,
        path: &TypedPath,
        actual: &RawValue,
        operator: &str,
        spec: &RawMatchSpec,
    ) -> bool {
        match self.evaluate(Mode::Report, path, actual, operator, spec) {
            Ok(outcome) => outcome.passed,
            Err(err) => {
                log::warn!("condition on '{path}' treated as false: {err}");
                false
            }
        }
    }
}
