//! Names of the text-match strategies.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::name::normalise_name;

/// Text comparison algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Whole-string equality.
    Exact,
    /// Candidate begins with the pattern.
    StartsWith,
    /// Candidate ends with the pattern.
    EndsWith,
    /// Pattern occurs anywhere in the candidate.
    Contains,
    /// Pattern is a regular expression.
    Regex,
}

impl MatchKind {
    /// Canonical strategy name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::StartsWith => "starts-with",
            Self::EndsWith => "ends-with",
            Self::Contains => "contains",
            Self::Regex => "regex",
        }
    }
}

/// A [`MatchKind`] plus whether the name itself demands case-insensitive
/// matching (the `*-ignore-case` spellings).
///
/// # Examples
///
/// ```
/// use stepcheck_types::{MatchKind, StrategyTag};
///
/// let tag: StrategyTag = "startsWithIgnoreCase".parse().unwrap();
/// assert_eq!(tag.kind, MatchKind::StartsWith);
/// assert!(tag.ignore_case);
/// assert_eq!(tag.to_string(), "starts-with-ignore-case");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrategyTag {
    /// Comparison algorithm.
    pub kind: MatchKind,
    /// Forces case-insensitive matching regardless of the `ignoreCase` flag.
    pub ignore_case: bool,
}

impl StrategyTag {
    /// Default strategy: case-sensitive exact match.
    pub const EXACT: Self = Self::new(MatchKind::Exact, false);

    /// Construct a tag.
    #[must_use]
    pub const fn new(kind: MatchKind, ignore_case: bool) -> Self {
        Self { kind, ignore_case }
    }

    /// Resolve a name against the built-in table only.
    #[must_use]
    pub fn from_builtin_name(name: &str) -> Option<Self> {
        let key = normalise_name(name);
        BUILTIN_STRATEGY_NAMES
            .iter()
            .find_map(|(known, tag)| (*known == key).then_some(*tag))
    }
}

impl Default for StrategyTag {
    fn default() -> Self {
        Self::EXACT
    }
}

impl fmt::Display for StrategyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if self.ignore_case {
            f.write_str("-ignore-case")?;
        }
        Ok(())
    }
}

/// Built-in strategy names, keyed by their [`normalise_name`] form.
pub const BUILTIN_STRATEGY_NAMES: &[(&str, StrategyTag)] = &[
    ("exact", StrategyTag::new(MatchKind::Exact, false)),
    ("equals", StrategyTag::new(MatchKind::Exact, false)),
    ("exactignorecase", StrategyTag::new(MatchKind::Exact, true)),
    ("equalsignorecase", StrategyTag::new(MatchKind::Exact, true)),
    ("startswith", StrategyTag::new(MatchKind::StartsWith, false)),
    ("startswithignorecase", StrategyTag::new(MatchKind::StartsWith, true)),
    ("endswith", StrategyTag::new(MatchKind::EndsWith, false)),
    ("endswithignorecase", StrategyTag::new(MatchKind::EndsWith, true)),
    ("contains", StrategyTag::new(MatchKind::Contains, false)),
    ("substring", StrategyTag::new(MatchKind::Contains, false)),
    ("containsignorecase", StrategyTag::new(MatchKind::Contains, true)),
    ("regex", StrategyTag::new(MatchKind::Regex, false)),
    ("matches", StrategyTag::new(MatchKind::Regex, false)),
    ("regexignorecase", StrategyTag::new(MatchKind::Regex, true)),
];

/// Error returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown text match strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyTag {
    type Err = UnknownStrategy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_builtin_name(value).ok_or_else(|| UnknownStrategy(value.trim().to_string()))
    }
}
