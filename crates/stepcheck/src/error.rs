//! Error tiers surfaced by the assertion engine.
//!
//! [`ConfigError`] marks a defect in the scenario script: an unknown operator,
//! strategy or value type, or an unparsable match specification. A data
//! mismatch is reported separately through [`EvaluationError::Mismatch`], so
//! callers can tell authoring mistakes from live-data failures.

use stepcheck_types::ValueType;
use thiserror::Error;

use crate::evaluator::EvaluationOutcome;

/// Authoring defect detected before any value comparison takes place.
///
/// # Examples
///
/// ```
/// use stepcheck::ConfigError;
///
/// let err = ConfigError::UnknownOperator { token: "~=".into() };
/// assert_eq!(err.to_string(), "unknown comparison operator '~='");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The operator token is not in the operator table.
    #[error("unknown comparison operator '{token}'")]
    UnknownOperator {
        /// Token as written, trimmed.
        token: String,
    },
    /// The `textMatchMechanism` name is not in the strategy table.
    #[error("unknown text match strategy '{name}'")]
    UnknownStrategy {
        /// Strategy name as written, trimmed.
        name: String,
    },
    /// The `valueType` name is not a known value type.
    #[error("unknown value type '{name}'")]
    UnknownValueType {
        /// Value-type name as written, trimmed.
        name: String,
    },
    /// The structured document could not be read.
    #[error("malformed match specification: {reason}")]
    MalformedSpec {
        /// Parser diagnostic.
        reason: String,
    },
    /// The expected value cannot be represented as the declared type.
    #[error("expected value {value} cannot be read as {value_type}")]
    ExpectedTypeMismatch {
        /// Declared type.
        value_type: ValueType,
        /// Offending value, rendered as JSON.
        value: String,
    },
    /// A regular-expression pattern failed to compile.
    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidRegex {
        /// Pattern text.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
    /// A yes/no flag carried an unrecognised value.
    #[error("invalid value '{value}' for '{key}' (expected yes/no/true/false)")]
    InvalidFlag {
        /// Document key.
        key: &'static str,
        /// Offending value.
        value: String,
    },
    /// The occurrence count is not a non-negative integer.
    #[error("invalid occurrence count '{value}' (expected a non-negative integer)")]
    InvalidOccurrence {
        /// Offending value.
        value: String,
    },
}

/// Failure returned by the raising entry points.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum EvaluationError {
    /// The scenario script is defective; raised in every mode.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The actual value did not satisfy the comparison.
    #[error("{0}")]
    Mismatch(Box<EvaluationOutcome>),
}

impl EvaluationError {
    /// Returns `true` for authoring defects.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// The failing outcome, for data mismatches.
    #[must_use]
    pub fn outcome(&self) -> Option<&EvaluationOutcome> {
        match self {
            Self::Mismatch(outcome) => Some(outcome),
            Self::Config(_) => None,
        }
    }
}

/// First failing row of a batch.
#[derive(Debug, Clone, Error)]
#[error("check {row} ({path}) failed: {source}")]
pub struct BatchError {
    /// 1-based position of the row in the batch.
    pub row: usize,
    /// Path named by the row.
    pub path: String,
    /// Underlying failure.
    pub source: EvaluationError,
}
