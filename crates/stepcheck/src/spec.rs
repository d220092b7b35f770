//! Declarative expected-value specifications.
//!
//! Scenario authors write either a bare literal (`Paid`) or a JSON document
//! such as `{"ev": ["a", "c"], "inOrder": "no", "textMatchMechanism": "regex"}`.
//! [`MatchSpec::parse`] turns either form into a validated [`MatchSpec`] or a
//! [`ConfigError`].

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use stepcheck_types::ValueType;

use crate::datatable::truthy_bool;
use crate::error::ConfigError;
use crate::strategy::{CompiledPattern, StringMatchStrategy};
use crate::value::{RawValue, Scalar, TypedValue};

/// Unparsed specification as received from a step or table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawMatchSpec {
    /// Text written by the author; a leading `{` marks a JSON document.
    Text(String),
    /// Already-decoded JSON.
    Json(RawValue),
}

impl From<&str> for RawMatchSpec {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for RawMatchSpec {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<RawValue> for RawMatchSpec {
    fn from(value: RawValue) -> Self {
        Self::Json(value)
    }
}

impl fmt::Display for RawMatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct SpecDocument {
    #[serde(default)]
    ev: Option<RawValue>,
    #[serde(default)]
    value_type: Option<String>,
    #[serde(default)]
    text_match_mechanism: Option<String>,
    #[serde(default)]
    in_order: Option<Flag>,
    #[serde(default)]
    ignore_case: Option<Flag>,
    #[serde(default)]
    n: Option<Count>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Word(String),
}

impl Flag {
    fn resolve(self, key: &'static str) -> Result<bool, ConfigError> {
        match self {
            Self::Bool(value) => Ok(value),
            Self::Word(word) => truthy_bool(&word).map_err(|_| ConfigError::InvalidFlag {
                key,
                value: word,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Count {
    Number(serde_json::Number),
    Word(String),
}

impl Count {
    fn resolve(self) -> Result<usize, ConfigError> {
        let parsed = match &self {
            Self::Number(number) => number.as_u64(),
            Self::Word(word) => word.trim().parse::<u64>().ok(),
        };
        parsed
            .and_then(|count| usize::try_from(count).ok())
            .ok_or_else(|| ConfigError::InvalidOccurrence {
                value: match self {
                    Self::Number(number) => number.to_string(),
                    Self::Word(word) => word,
                },
            })
    }
}

/// Validated expected-value specification.
///
/// Regex patterns in the expected value are compiled when the spec is built
/// and reused by every comparison made with it.
///
/// # Examples
///
/// ```
/// use stepcheck::{MatchSpec, RawMatchSpec, TypedValue};
///
/// let spec = MatchSpec::parse(&RawMatchSpec::from(r#"{"ev": "hello", "ignoreCase": "yes"}"#))
///     .unwrap();
/// assert_eq!(spec.expected(), &TypedValue::text("hello"));
/// assert!(!spec.case_sensitive());
///
/// let literal = MatchSpec::parse(&RawMatchSpec::from("Paid")).unwrap();
/// assert_eq!(literal.expected(), &TypedValue::text("Paid"));
/// assert!(literal.case_sensitive());
/// ```
#[derive(Debug, Clone)]
pub struct MatchSpec {
    expected: TypedValue,
    strategy: StringMatchStrategy,
    case_sensitive: bool,
    ordered: bool,
    occurrence: Option<usize>,
    // Keyed by the rendered pattern; derived from the fields above.
    patterns: HashMap<String, CompiledPattern>,
}

impl PartialEq for MatchSpec {
    fn eq(&self, other: &Self) -> bool {
        self.expected == other.expected
            && self.strategy == other.strategy
            && self.case_sensitive == other.case_sensitive
            && self.ordered == other.ordered
            && self.occurrence == other.occurrence
    }
}

impl Eq for MatchSpec {}

impl Default for MatchSpec {
    fn default() -> Self {
        Self::new(TypedValue::Null)
    }
}

impl MatchSpec {
    /// Spec with default qualifiers: exact, case-sensitive, ordered, no count.
    #[must_use]
    pub fn new(expected: TypedValue) -> Self {
        Self {
            expected,
            strategy: StringMatchStrategy::EXACT,
            case_sensitive: true,
            ordered: true,
            occurrence: None,
            patterns: HashMap::new(),
        }
    }

    /// Replace the text match strategy.
    ///
    /// Regex patterns that fail to compile are skipped here and never match;
    /// [`parse`](Self::parse) rejects them instead.
    #[must_use]
    pub fn with_strategy(mut self, strategy: StringMatchStrategy) -> Self {
        self.strategy = strategy;
        self.patterns = compile_patterns(strategy, self.case_sensitive, &self.expected).0;
        self
    }

    /// Set case sensitivity.
    #[must_use]
    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self.patterns = compile_patterns(self.strategy, case_sensitive, &self.expected).0;
        self
    }

    /// Set whether list comparisons respect order.
    #[must_use]
    pub fn with_ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    /// Require an exact occurrence count for containment checks.
    #[must_use]
    pub fn with_occurrence(mut self, occurrence: usize) -> Self {
        self.occurrence = Some(occurrence);
        self
    }

    /// Expected value.
    #[must_use]
    pub fn expected(&self) -> &TypedValue {
        &self.expected
    }

    /// Text match strategy.
    #[must_use]
    pub const fn strategy(&self) -> StringMatchStrategy {
        self.strategy
    }

    /// Whether text comparisons honour case.
    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Whether list comparisons honour order.
    #[must_use]
    pub const fn ordered(&self) -> bool {
        self.ordered
    }

    /// Required occurrence count, if any.
    #[must_use]
    pub const fn occurrence(&self) -> Option<usize> {
        self.occurrence
    }

    /// Equality-style text match of `candidate` against an expected pattern.
    pub(crate) fn text_matches(&self, candidate: &str, pattern: &str) -> bool {
        self.strategy.is_match_with(
            candidate,
            pattern,
            self.patterns.get(pattern),
            self.case_sensitive,
        )
    }

    /// Occurrences of an expected pattern in `candidate`.
    pub(crate) fn text_occurrences(&self, candidate: &str, pattern: &str) -> usize {
        self.strategy.count_in_with(
            candidate,
            pattern,
            self.patterns.get(pattern),
            self.case_sensitive,
        )
    }

    /// Parse and validate a raw specification.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the document is malformed, names an
    /// unknown strategy or value type, carries an invalid flag or count,
    /// holds an expected value that cannot be read as the declared type, or
    /// supplies a regex pattern that does not compile.
    pub fn parse(raw: &RawMatchSpec) -> Result<Self, ConfigError> {
        let document = match raw {
            RawMatchSpec::Text(text) => {
                if !text.trim_start().starts_with('{') {
                    return Self::literal(text);
                }
                serde_json::from_str::<RawValue>(text).map_err(|err| {
                    ConfigError::MalformedSpec {
                        reason: err.to_string(),
                    }
                })?
            }
            RawMatchSpec::Json(value) => value.clone(),
        };
        match document {
            RawValue::String(text) => Self::literal(&text),
            RawValue::Null => Self::from_document(SpecDocument::default()),
            RawValue::Object(_) => {
                let parsed = serde_json::from_value::<SpecDocument>(document).map_err(|err| {
                    ConfigError::MalformedSpec {
                        reason: err.to_string(),
                    }
                })?;
                Self::from_document(parsed)
            }
            other => Self::from_document(SpecDocument {
                ev: Some(other),
                ..SpecDocument::default()
            }),
        }
    }

    fn literal(text: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(TypedValue::text(text)))
    }

    fn from_document(document: SpecDocument) -> Result<Self, ConfigError> {
        let declared = document
            .value_type
            .as_deref()
            .map(|name| {
                name.parse::<ValueType>()
                    .map_err(|_| ConfigError::UnknownValueType {
                        name: name.trim().to_string(),
                    })
            })
            .transpose()?;
        let strategy = document
            .text_match_mechanism
            .as_deref()
            .map(StringMatchStrategy::resolve)
            .transpose()?
            .unwrap_or_default();
        let case_sensitive = match document.ignore_case {
            Some(flag) => !flag.resolve("ignoreCase")?,
            None => true,
        };
        let ordered = match document.in_order {
            Some(flag) => flag.resolve("inOrder")?,
            None => true,
        };
        let occurrence = document.n.map(Count::resolve).transpose()?;
        let expected = expected_value(document.ev.as_ref(), declared)?;
        let (patterns, invalid) = compile_patterns(strategy, case_sensitive, &expected);
        if let Some(err) = invalid {
            return Err(err);
        }
        Ok(Self {
            expected,
            strategy,
            case_sensitive,
            ordered,
            occurrence,
            patterns,
        })
    }
}

fn expected_value(
    ev: Option<&RawValue>,
    declared: Option<ValueType>,
) -> Result<TypedValue, ConfigError> {
    let Some(raw) = ev else {
        return Ok(TypedValue::Null);
    };
    let inferred = TypedValue::infer(raw);
    let Some(value_type) = declared else {
        return Ok(inferred);
    };
    inferred
        .convert(value_type)
        .ok_or_else(|| ConfigError::ExpectedTypeMismatch {
            value_type,
            value: raw.to_string(),
        })
}

// Compiles every distinct expected pattern, returning the first failure
// alongside the patterns that did compile.
fn compile_patterns(
    strategy: StringMatchStrategy,
    case_sensitive: bool,
    expected: &TypedValue,
) -> (HashMap<String, CompiledPattern>, Option<ConfigError>) {
    let mut patterns = HashMap::new();
    let mut invalid = None;
    let items = match expected {
        TypedValue::Null => Vec::new(),
        TypedValue::Scalar(item) => vec![item.clone()],
        TypedValue::List(list) => list.scalars(),
    };
    for source in items.iter().map(Scalar::render) {
        if patterns.contains_key(&source) {
            continue;
        }
        match strategy.compile(&source, case_sensitive) {
            Ok(Some(compiled)) => {
                patterns.insert(source, compiled);
            }
            // Not a regex strategy.
            Ok(None) => break,
            Err(err) => {
                log::debug!("{err}");
                if invalid.is_none() {
                    invalid = Some(err);
                }
            }
        }
    }
    (patterns, invalid)
}

impl fmt::Display for MatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expected)?;
        let mut qualifiers = Vec::new();
        if self.strategy.tag() != StringMatchStrategy::EXACT.tag() {
            qualifiers.push(format!("using {}", self.strategy.tag()));
        }
        if !self.case_sensitive {
            qualifiers.push("ignoring case".to_string());
        }
        if !self.ordered {
            qualifiers.push("in any order".to_string());
        }
        if let Some(count) = self.occurrence {
            qualifiers.push(format!("exactly {count} time(s)"));
        }
        if !qualifiers.is_empty() {
            write!(f, " ({})", qualifiers.join(", "))?;
        }
        Ok(())
    }
}
