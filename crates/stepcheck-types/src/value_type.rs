//! Declared shapes for values flowing through the assertion engine.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::name::normalise_name;

/// Element type of a scalar or of every item of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Free-form text.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// Exact decimal number.
    Decimal,
    /// `true` or `false`.
    Boolean,
}

impl ScalarType {
    /// Canonical name used in match specifications.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepcheck_types::ScalarType;
    ///
    /// assert_eq!(ScalarType::Text.as_str(), "string");
    /// assert_eq!(ScalarType::Boolean.as_str(), "boolean");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
        }
    }

    /// Returns `true` for [`Integer`](Self::Integer) and
    /// [`Decimal`](Self::Decimal).
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "string" | "text" | "str" => Some(Self::Text),
            "integer" | "int" | "long" => Some(Self::Integer),
            "decimal" | "double" | "float" | "number" => Some(Self::Decimal),
            "boolean" | "bool" => Some(Self::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of value shapes: a scalar or a homogeneous list of scalars.
///
/// # Examples
///
/// ```
/// use stepcheck_types::{ScalarType, ValueType};
///
/// let parsed: ValueType = "Integer-List".parse().unwrap();
/// assert_eq!(parsed, ValueType::List(ScalarType::Integer));
/// assert_eq!(parsed.to_string(), "integer-list");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A single value.
    Scalar(ScalarType),
    /// An ordered, homogeneous sequence of values.
    List(ScalarType),
}

impl ValueType {
    /// Shorthand for `ValueType::Scalar(ScalarType::Text)`.
    pub const TEXT: Self = Self::Scalar(ScalarType::Text);

    /// Type of the scalar or of each list element.
    #[must_use]
    pub const fn element(self) -> ScalarType {
        match self {
            Self::Scalar(ty) | Self::List(ty) => ty,
        }
    }

    /// Returns `true` for list shapes.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::List(_))
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(ty) => f.write_str(ty.as_str()),
            Self::List(ty) => write!(f, "{}-list", ty.as_str()),
        }
    }
}

/// Error returned when a value-type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value type: {0}")]
pub struct UnknownValueType(pub String);

impl FromStr for ValueType {
    type Err = UnknownValueType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = normalise_name(value);
        let parsed = match key.strip_suffix("list") {
            Some(element) => ScalarType::from_key(element).map(Self::List),
            None => ScalarType::from_key(&key).map(Self::Scalar),
        };
        parsed.ok_or_else(|| UnknownValueType(value.trim().to_string()))
    }
}
