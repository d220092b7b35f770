//! Comparison operators understood by the assertion engine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::name::normalise_name;

/// Named relational or set predicate applied between an actual value and an
/// expected value.
///
/// # Examples
///
/// ```
/// use stepcheck_types::ComparisonOperator;
///
/// let op: ComparisonOperator = " Not Contains ".parse().unwrap();
/// assert_eq!(op, ComparisonOperator::NotContains);
/// assert_eq!(op.as_token(), "not-contains");
/// assert_eq!(op.positive(), ComparisonOperator::Contains);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// Structural equality after coercion.
    Equals,
    /// Negation of [`Equals`](Self::Equals).
    NotEquals,
    /// Numeric `>`.
    GreaterThan,
    /// Numeric `>=`.
    GreaterOrEqual,
    /// Numeric `<`.
    LessThan,
    /// Numeric `<=`.
    LessOrEqual,
    /// Membership, subsequence or substring test.
    Contains,
    /// Negation of [`Contains`](Self::Contains).
    NotContains,
    /// The actual value exists.
    Present,
    /// The actual value is absent.
    NotPresent,
}

/// Built-in operator tokens, keyed by their [`normalise_name`] form.
///
/// Hosts can add further spellings at link time through the runtime crate.
pub const BUILTIN_OPERATOR_TOKENS: &[(&str, ComparisonOperator)] = &[
    ("=", ComparisonOperator::Equals),
    ("==", ComparisonOperator::Equals),
    ("equals", ComparisonOperator::Equals),
    ("!=", ComparisonOperator::NotEquals),
    ("<>", ComparisonOperator::NotEquals),
    ("notequals", ComparisonOperator::NotEquals),
    (">", ComparisonOperator::GreaterThan),
    (">=", ComparisonOperator::GreaterOrEqual),
    ("<", ComparisonOperator::LessThan),
    ("<=", ComparisonOperator::LessOrEqual),
    ("contains", ComparisonOperator::Contains),
    ("notcontains", ComparisonOperator::NotContains),
    ("present", ComparisonOperator::Present),
    ("exists", ComparisonOperator::Present),
    ("notpresent", ComparisonOperator::NotPresent),
    ("notexists", ComparisonOperator::NotPresent),
];

impl ComparisonOperator {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Equals,
        Self::NotEquals,
        Self::GreaterThan,
        Self::GreaterOrEqual,
        Self::LessThan,
        Self::LessOrEqual,
        Self::Contains,
        Self::NotContains,
        Self::Present,
        Self::NotPresent,
    ];

    /// Canonical token written in scenarios.
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::Contains => "contains",
            Self::NotContains => "not-contains",
            Self::Present => "present",
            Self::NotPresent => "not-present",
        }
    }

    /// Returns `true` for the four numeric operators.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::GreaterOrEqual | Self::LessThan | Self::LessOrEqual
        )
    }

    /// Returns `true` for `contains` and `not-contains`.
    #[must_use]
    pub const fn is_membership(self) -> bool {
        matches!(self, Self::Contains | Self::NotContains)
    }

    /// Returns `true` when the expected side plays no part in the decision.
    #[must_use]
    pub const fn ignores_expected(self) -> bool {
        matches!(self, Self::Present | Self::NotPresent)
    }

    /// Returns `true` for the negated forms.
    #[must_use]
    pub const fn is_negated(self) -> bool {
        matches!(self, Self::NotEquals | Self::NotContains | Self::NotPresent)
    }

    /// Positive counterpart of a negated operator; other operators map to
    /// themselves.
    #[must_use]
    pub const fn positive(self) -> Self {
        match self {
            Self::NotEquals => Self::Equals,
            Self::NotContains => Self::Contains,
            Self::NotPresent => Self::Present,
            other => other,
        }
    }

    /// Resolve a token against the built-in table only.
    #[must_use]
    pub fn from_builtin_token(token: &str) -> Option<Self> {
        let key = normalise_name(token);
        BUILTIN_OPERATOR_TOKENS
            .iter()
            .find_map(|(known, op)| (*known == key).then_some(*op))
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Error returned when an operator token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown comparison operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for ComparisonOperator {
    type Err = UnknownOperator;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_builtin_token(value).ok_or_else(|| UnknownOperator(value.trim().to_string()))
    }
}
