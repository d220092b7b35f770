//! Typed values and the paths they are read from.
//!
//! Collaborators hand the engine an opaque [`RawValue`]. [`TypedValue`] tags
//! it with one of the closed [`ValueType`] shapes, either by inference or by
//! honouring an explicit hint carried on a [`TypedPath`].

use std::fmt;
use std::str::FromStr;

use stepcheck_types::{ScalarType, ValueType};

use crate::number::Number;

/// Opaque value supplied by a collaborator (document query, UI read, table
/// cell, variable store).
pub type RawValue = serde_json::Value;

/// A single typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Free-form text.
    Text(String),
    /// Signed integer.
    Integer(i64),
    /// Decimal number; exact unless out of `rust_decimal`'s range.
    Decimal(Number),
    /// Boolean.
    Boolean(bool),
}

impl Scalar {
    /// Declared type of the value.
    #[must_use]
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Text(_) => ScalarType::Text,
            Self::Integer(_) => ScalarType::Integer,
            Self::Decimal(_) => ScalarType::Decimal,
            Self::Boolean(_) => ScalarType::Boolean,
        }
    }

    /// Plain textual rendering, without quotes.
    ///
    /// # Examples
    ///
    /// ```
    /// use stepcheck::Scalar;
    ///
    /// assert_eq!(Scalar::Integer(42).render(), "42");
    /// assert_eq!(Scalar::Text("a b".into()).render(), "a b");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
        }
    }

    /// Numeric view of the value, when it is numeric.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Self::Integer(value) => Some(Number::from(*value)),
            Self::Decimal(value) => Some(*value),
            Self::Text(_) | Self::Boolean(_) => None,
        }
    }

    /// Convert to another scalar type, returning `None` when the value has no
    /// faithful representation in the target type.
    #[must_use]
    pub fn convert(&self, target: ScalarType) -> Option<Self> {
        match target {
            ScalarType::Text => Some(Self::Text(self.render())),
            ScalarType::Integer => self.integer_value().map(Self::Integer),
            ScalarType::Decimal => self.number_value().map(Self::Decimal),
            ScalarType::Boolean => self.boolean_value().map(Self::Boolean),
        }
    }

    fn integer_value(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Decimal(value) => value.to_i64(),
            Self::Text(text) => parse_integer(text),
            Self::Boolean(_) => None,
        }
    }

    fn number_value(&self) -> Option<Number> {
        match self {
            Self::Text(text) => Number::parse(text),
            other => other.as_number(),
        }
    }

    fn boolean_value(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            Self::Text(text) => parse_bool_word(text, BoolWords::Data),
            Self::Integer(_) | Self::Decimal(_) => None,
        }
    }

    fn infer(raw: &RawValue) -> Option<Self> {
        match raw {
            RawValue::String(text) => Some(Self::Text(text.clone())),
            RawValue::Bool(value) => Some(Self::Boolean(*value)),
            RawValue::Number(number) => Some(number.as_i64().map_or_else(
                || {
                    let rendered = number.to_string();
                    Number::parse(&rendered).map_or(Self::Text(rendered), Self::Decimal)
                },
                Self::Integer,
            )),
            RawValue::Null | RawValue::Array(_) | RawValue::Object(_) => None,
        }
    }

    fn to_json(&self) -> RawValue {
        match self {
            Self::Text(text) => RawValue::String(text.clone()),
            Self::Integer(value) => RawValue::from(*value),
            Self::Decimal(value) => RawValue::String(value.to_string()),
            Self::Boolean(value) => RawValue::Bool(*value),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text:?}"),
            other => f.write_str(&other.render()),
        }
    }
}

/// A homogeneous list. The element type is fixed by the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum List {
    /// List of text values.
    Text(Vec<String>),
    /// List of integers.
    Integer(Vec<i64>),
    /// List of decimals.
    Decimal(Vec<Number>),
    /// List of booleans.
    Boolean(Vec<bool>),
}

impl List {
    /// Element type shared by every item.
    #[must_use]
    pub const fn element_type(&self) -> ScalarType {
        match self {
            Self::Text(_) => ScalarType::Text,
            Self::Integer(_) => ScalarType::Integer,
            Self::Decimal(_) => ScalarType::Decimal,
            Self::Boolean(_) => ScalarType::Boolean,
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(items) => items.len(),
            Self::Integer(items) => items.len(),
            Self::Decimal(items) => items.len(),
            Self::Boolean(items) => items.len(),
        }
    }

    /// Returns `true` when the list has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items as owned scalars, in order.
    #[must_use]
    pub fn scalars(&self) -> Vec<Scalar> {
        match self {
            Self::Text(items) => items.iter().cloned().map(Scalar::Text).collect(),
            Self::Integer(items) => items.iter().copied().map(Scalar::Integer).collect(),
            Self::Decimal(items) => items.iter().copied().map(Scalar::Decimal).collect(),
            Self::Boolean(items) => items.iter().copied().map(Scalar::Boolean).collect(),
        }
    }

    /// Build a list holding a single item.
    #[must_use]
    pub fn singleton(item: Scalar) -> Self {
        match item {
            Scalar::Text(value) => Self::Text(vec![value]),
            Scalar::Integer(value) => Self::Integer(vec![value]),
            Scalar::Decimal(value) => Self::Decimal(vec![value]),
            Scalar::Boolean(value) => Self::Boolean(vec![value]),
        }
    }

    /// Build a homogeneous list from arbitrary scalars.
    ///
    /// Mixed integers and decimals widen to decimals; any other mixture falls
    /// back to a text list of the rendered items.
    #[must_use]
    pub fn from_scalars(items: Vec<Scalar>) -> Self {
        let mut types = items.iter().map(Scalar::scalar_type);
        let first = types.next().unwrap_or(ScalarType::Text);
        let mut target = first;
        for ty in types {
            if ty == target {
                continue;
            }
            target = if ty.is_numeric() && target.is_numeric() {
                ScalarType::Decimal
            } else {
                ScalarType::Text
            };
        }
        Self::convert_items(&items, target).unwrap_or_else(|| {
            Self::Text(items.iter().map(Scalar::render).collect())
        })
    }

    /// Convert every item to `target`, failing when any item cannot be
    /// represented.
    #[must_use]
    pub fn convert(&self, target: ScalarType) -> Option<Self> {
        Self::convert_items(&self.scalars(), target)
    }

    fn convert_items(items: &[Scalar], target: ScalarType) -> Option<Self> {
        match target {
            ScalarType::Text => Some(Self::Text(items.iter().map(Scalar::render).collect())),
            ScalarType::Integer => items
                .iter()
                .map(Scalar::integer_value)
                .collect::<Option<_>>()
                .map(Self::Integer),
            ScalarType::Decimal => items
                .iter()
                .map(Scalar::number_value)
                .collect::<Option<_>>()
                .map(Self::Decimal),
            ScalarType::Boolean => items
                .iter()
                .map(Scalar::boolean_value)
                .collect::<Option<_>>()
                .map(Self::Boolean),
        }
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, item) in self.scalars().iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("]")
    }
}

/// A raw value tagged with its declared shape.
///
/// # Examples
///
/// ```
/// use stepcheck::{TypedValue, Scalar};
/// use stepcheck_types::{ScalarType, ValueType};
///
/// let value = TypedValue::infer(&serde_json::json!([1, 2, 3]));
/// assert_eq!(value.value_type(), Some(ValueType::List(ScalarType::Integer)));
///
/// let text = TypedValue::infer(&serde_json::json!("5"));
/// assert_eq!(text, TypedValue::Scalar(Scalar::Text("5".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypedValue {
    /// No value could be obtained.
    #[default]
    Null,
    /// A single value.
    Scalar(Scalar),
    /// A homogeneous list.
    List(List),
}

impl TypedValue {
    /// Shorthand for a text scalar.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(value.into()))
    }

    /// Declared type, or `None` for [`Null`](Self::Null).
    #[must_use]
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::Null => None,
            Self::Scalar(item) => Some(ValueType::Scalar(item.scalar_type())),
            Self::List(list) => Some(ValueType::List(list.element_type())),
        }
    }

    /// Returns `true` for [`Null`](Self::Null).
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Infer a typed value from a raw value.
    ///
    /// Homogeneous arrays become lists, JSON booleans become
    /// [`Scalar::Boolean`], integral numbers within `i64` [`Scalar::Integer`]
    /// and every other number [`Scalar::Decimal`]; anything else is text.
    #[must_use]
    pub fn infer(raw: &RawValue) -> Self {
        match raw {
            RawValue::Null => Self::Null,
            RawValue::Array(items) => Self::List(infer_list(items)),
            RawValue::Object(_) => Self::text(raw.to_string()),
            scalar => Scalar::infer(scalar).map_or(Self::Null, Self::Scalar),
        }
    }

    /// Type a raw value, preferring `hint` when it can be honoured.
    ///
    /// A hint that cannot be applied leaves the inferred value untouched so
    /// later comparisons report a mismatch rather than failing here.
    #[must_use]
    pub fn from_raw(raw: &RawValue, hint: Option<ValueType>) -> Self {
        let inferred = Self::infer(raw);
        match hint {
            Some(ty) => inferred.convert(ty).unwrap_or(inferred),
            None => inferred,
        }
    }

    /// Convert to `target`. Scalars convert into singleton lists; lists never
    /// collapse into scalars. [`Null`](Self::Null) stays null.
    #[must_use]
    pub fn convert(&self, target: ValueType) -> Option<Self> {
        match (self, target) {
            (Self::Null, _) => Some(Self::Null),
            (Self::Scalar(item), ValueType::Scalar(ty)) => item.convert(ty).map(Self::Scalar),
            (Self::Scalar(item), ValueType::List(ty)) => item
                .convert(ty)
                .map(|converted| Self::List(List::singleton(converted))),
            (Self::List(list), ValueType::List(ty)) => list.convert(ty).map(Self::List),
            (Self::List(_), ValueType::Scalar(_)) => None,
        }
    }

    /// JSON rendering used by reports.
    #[must_use]
    pub fn to_json(&self) -> RawValue {
        match self {
            Self::Null => RawValue::Null,
            Self::Scalar(item) => item.to_json(),
            Self::List(list) => {
                RawValue::Array(list.scalars().iter().map(Scalar::to_json).collect())
            }
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Scalar(item) => fmt::Display::fmt(item, f),
            Self::List(list) => fmt::Display::fmt(list, f),
        }
    }
}

impl From<Scalar> for TypedValue {
    fn from(item: Scalar) -> Self {
        Self::Scalar(item)
    }
}

impl From<List> for TypedValue {
    fn from(list: List) -> Self {
        Self::List(list)
    }
}

fn infer_list(items: &[RawValue]) -> List {
    let scalars = items.iter().map(Scalar::infer).collect::<Option<Vec<_>>>();
    match scalars {
        Some(scalars) => List::from_scalars(scalars),
        None => List::Text(
            items
                .iter()
                .map(|item| match item {
                    RawValue::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
    }
}

/// Where the value under test was read from. Affects diagnostic wording only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueOrigin {
    /// A document field, table cell or variable.
    #[default]
    Data,
    /// A user-interface element.
    Element,
}

impl ValueOrigin {
    /// Lowercase label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Element => "element",
        }
    }

    pub(crate) const fn noun(self) -> &'static str {
        match self {
            Self::Data => "value at",
            Self::Element => "element",
        }
    }
}

/// The location a value was read from, with an optional type hint.
///
/// A trailing `:type` suffix is treated as a hint only when it names a known
/// value type; otherwise the whole string is the path.
///
/// # Examples
///
/// ```
/// use stepcheck::TypedPath;
/// use stepcheck_types::{ScalarType, ValueType};
///
/// let path = TypedPath::parse("order.total:decimal");
/// assert_eq!(path.path(), "order.total");
/// assert_eq!(path.hint(), Some(ValueType::Scalar(ScalarType::Decimal)));
///
/// let plain = TypedPath::parse("urn:isbn");
/// assert_eq!(plain.path(), "urn:isbn");
/// assert_eq!(plain.hint(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypedPath {
    path: String,
    hint: Option<ValueType>,
    origin: ValueOrigin,
}

impl TypedPath {
    /// A path with no hint.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hint: None,
            origin: ValueOrigin::Data,
        }
    }

    /// Split an optional `:type` suffix from `raw`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some((path, suffix)) = trimmed.rsplit_once(':') {
            if let Ok(hint) = ValueType::from_str(suffix) {
                return Self::new(path.trim_end()).with_hint(hint);
            }
        }
        Self::new(trimmed)
    }

    /// Attach an explicit type hint.
    #[must_use]
    pub fn with_hint(mut self, hint: ValueType) -> Self {
        self.hint = Some(hint);
        self
    }

    /// Record where the value was read from.
    #[must_use]
    pub fn with_origin(mut self, origin: ValueOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// The path expression.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Explicit type hint, if any.
    #[must_use]
    pub const fn hint(&self) -> Option<ValueType> {
        self.hint
    }

    /// Where the value was read from.
    #[must_use]
    pub const fn origin(&self) -> ValueOrigin {
        self.origin
    }
}

impl From<&str> for TypedPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for TypedPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl fmt::Display for TypedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Parse integer-looking text.
pub(crate) fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse().ok()
}

/// Yes/no spellings, from the narrowest set to the widest. Each set also
/// accepts every word of the sets before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum BoolWords {
    /// `yes`/`true` and `no`/`false`, as read from data values.
    Data,
    /// Adds `y`/`n` and `1`/`0`, for spec and table flags.
    Flag,
    /// Adds `on`/`off`, for environment switches.
    Switch,
}

const BOOL_WORDS: &[(&str, bool, BoolWords)] = &[
    ("yes", true, BoolWords::Data),
    ("true", true, BoolWords::Data),
    ("no", false, BoolWords::Data),
    ("false", false, BoolWords::Data),
    ("y", true, BoolWords::Flag),
    ("1", true, BoolWords::Flag),
    ("n", false, BoolWords::Flag),
    ("0", false, BoolWords::Flag),
    ("on", true, BoolWords::Switch),
    ("off", false, BoolWords::Switch),
];

/// Parse a yes/no word from `words`, ignoring case and outer whitespace.
pub(crate) fn parse_bool_word(text: &str, words: BoolWords) -> Option<bool> {
    let folded = text.trim().to_ascii_lowercase();
    BOOL_WORDS
        .iter()
        .find(|(word, _, set)| *set <= words && *word == folded)
        .map(|(_, value, _)| *value)
}
