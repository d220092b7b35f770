//! Text-match predicates.
//!
//! A [`StringMatchStrategy`] answers two questions about a candidate string
//! and a pattern: does the candidate *match* the pattern (equality-style, used
//! by `=`, list membership and list equality) and does the pattern *occur in*
//! the candidate (containment-style, used by `contains` on text).

use regex::{Regex, RegexBuilder};
use stepcheck_types::{MatchKind, StrategyTag};

use crate::error::ConfigError;
use crate::registry;

/// Pluggable text comparison resolved from a strategy name.
///
/// # Examples
///
/// ```
/// use stepcheck::StringMatchStrategy;
///
/// let starts = StringMatchStrategy::resolve("starts-with").unwrap();
/// assert!(starts.is_match("Hello world", "Hello", true));
/// assert!(!starts.is_match("hello world", "Hello", true));
/// assert!(starts.is_match("hello world", "Hello", false));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StringMatchStrategy {
    tag: StrategyTag,
}

impl StringMatchStrategy {
    /// Case-sensitive exact match.
    pub const EXACT: Self = Self::new(StrategyTag::EXACT);

    /// Wrap a strategy tag.
    #[must_use]
    pub const fn new(tag: StrategyTag) -> Self {
        Self { tag }
    }

    /// Look a strategy up by name in the strategy table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownStrategy`] when the name is not
    /// registered.
    pub fn resolve(name: &str) -> Result<Self, ConfigError> {
        registry::lookup_strategy(name)
    }

    /// Underlying tag.
    #[must_use]
    pub const fn tag(self) -> StrategyTag {
        self.tag
    }

    /// Comparison algorithm.
    #[must_use]
    pub const fn kind(self) -> MatchKind {
        self.tag.kind
    }

    /// Returns `true` unless this is the plain exact strategy. Textual
    /// strategies suppress numeric and boolean coercion of text operands.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        !matches!(self.tag.kind, MatchKind::Exact)
    }

    const fn effective_case(self, case_sensitive: bool) -> bool {
        case_sensitive && !self.tag.ignore_case
    }

    /// Check that `pattern` is usable with this strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] when a regex pattern does not
    /// compile, either on its own or anchored to the whole candidate.
    pub fn validate(self, pattern: &str) -> Result<(), ConfigError> {
        self.compile(pattern, true).map(drop)
    }

    /// Compile `pattern` once for later matching. Non-regex strategies have
    /// nothing to compile and yield `None`.
    pub(crate) fn compile(
        self,
        pattern: &str,
        case_sensitive: bool,
    ) -> Result<Option<CompiledPattern>, ConfigError> {
        if !matches!(self.tag.kind, MatchKind::Regex) {
            return Ok(None);
        }
        CompiledPattern::new(pattern, self.effective_case(case_sensitive))
            .map(Some)
            .map_err(|err| ConfigError::InvalidRegex {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })
    }

    /// Equality-style predicate. A regex must match the whole candidate.
    #[must_use]
    pub fn is_match(self, candidate: &str, pattern: &str, case_sensitive: bool) -> bool {
        self.is_match_with(candidate, pattern, None, case_sensitive)
    }

    /// [`is_match`](Self::is_match) reusing a pattern compiled by
    /// [`compile`](Self::compile) with the same case sensitivity.
    pub(crate) fn is_match_with(
        self,
        candidate: &str,
        pattern: &str,
        compiled: Option<&CompiledPattern>,
        case_sensitive: bool,
    ) -> bool {
        let case_sensitive = self.effective_case(case_sensitive);
        match self.tag.kind {
            MatchKind::Regex => match compiled {
                Some(compiled) => compiled.whole.is_match(candidate),
                None => build(&anchored(pattern), case_sensitive)
                    .is_ok_and(|regex| regex.is_match(candidate)),
            },
            kind => {
                let (candidate, pattern) = fold(candidate, pattern, case_sensitive);
                match kind {
                    MatchKind::Exact => candidate == pattern,
                    MatchKind::StartsWith => candidate.starts_with(pattern.as_str()),
                    MatchKind::EndsWith => candidate.ends_with(pattern.as_str()),
                    MatchKind::Contains | MatchKind::Regex => {
                        candidate.contains(pattern.as_str())
                    }
                }
            }
        }
    }

    /// Containment-style predicate. Exact degrades to a substring test and a
    /// regex may match anywhere.
    #[must_use]
    pub fn occurs_in(self, candidate: &str, pattern: &str, case_sensitive: bool) -> bool {
        self.count_in(candidate, pattern, case_sensitive) > 0
    }

    /// Number of non-overlapping occurrences of `pattern` in `candidate`.
    /// Anchored strategies count at most one.
    #[must_use]
    pub fn count_in(self, candidate: &str, pattern: &str, case_sensitive: bool) -> usize {
        self.count_in_with(candidate, pattern, None, case_sensitive)
    }

    /// [`count_in`](Self::count_in) reusing a compiled pattern.
    pub(crate) fn count_in_with(
        self,
        candidate: &str,
        pattern: &str,
        compiled: Option<&CompiledPattern>,
        case_sensitive: bool,
    ) -> usize {
        match self.tag.kind {
            MatchKind::Regex => match compiled {
                Some(compiled) => compiled.anywhere.find_iter(candidate).count(),
                None => build(pattern, self.effective_case(case_sensitive))
                    .map_or(0, |regex| regex.find_iter(candidate).count()),
            },
            MatchKind::Exact | MatchKind::Contains => {
                let case_sensitive = self.effective_case(case_sensitive);
                let (candidate, pattern) = fold(candidate, pattern, case_sensitive);
                if pattern.is_empty() {
                    return 1;
                }
                candidate.matches(pattern.as_str()).count()
            }
            MatchKind::StartsWith | MatchKind::EndsWith => {
                usize::from(self.is_match(candidate, pattern, case_sensitive))
            }
        }
    }
}

impl From<StrategyTag> for StringMatchStrategy {
    fn from(tag: StrategyTag) -> Self {
        Self::new(tag)
    }
}

fn fold(candidate: &str, pattern: &str, case_sensitive: bool) -> (String, String) {
    if case_sensitive {
        (candidate.to_string(), pattern.to_string())
    } else {
        (candidate.to_lowercase(), pattern.to_lowercase())
    }
}

/// A regex pattern in both forms the predicates use.
#[derive(Debug, Clone)]
pub(crate) struct CompiledPattern {
    whole: Regex,
    anywhere: Regex,
}

impl CompiledPattern {
    fn new(pattern: &str, case_sensitive: bool) -> Result<Self, regex::Error> {
        Ok(Self {
            whole: build(&anchored(pattern), case_sensitive)?,
            anywhere: build(pattern, case_sensitive)?,
        })
    }
}

fn anchored(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

fn build(source: &str, case_sensitive: bool) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source)
        .case_insensitive(!case_sensitive)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strategy(kind: MatchKind, ignore_case: bool) -> StringMatchStrategy {
        StringMatchStrategy::new(StrategyTag::new(kind, ignore_case))
    }

    #[rstest]
    #[case(MatchKind::Exact, "abc", "abc", true)]
    #[case(MatchKind::Exact, "abc", "ab", false)]
    #[case(MatchKind::StartsWith, "abc", "ab", true)]
    #[case(MatchKind::EndsWith, "abc", "bc", true)]
    #[case(MatchKind::EndsWith, "abc", "ab", false)]
    #[case(MatchKind::Contains, "abc", "b", true)]
    #[case(MatchKind::Regex, "order-17", r"order-\d+", true)]
    #[case(MatchKind::Regex, "my order-17", r"order-\d+", false)]
    fn equality_style_predicates(
        #[case] kind: MatchKind,
        #[case] candidate: &str,
        #[case] pattern: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(strategy(kind, false).is_match(candidate, pattern, true), expected);
    }

    #[test]
    fn ignore_case_variants_force_insensitivity() {
        let forced = strategy(MatchKind::Exact, true);
        assert!(forced.is_match("HELLO", "hello", true));
        assert!(!strategy(MatchKind::Exact, false).is_match("HELLO", "hello", true));
        assert!(strategy(MatchKind::Regex, true).is_match("ABC", "a.c", true));
    }

    #[test]
    fn containment_counts_occurrences() {
        let exact = StringMatchStrategy::EXACT;
        assert_eq!(exact.count_in("a-b-a-b-a", "a", true), 3);
        assert_eq!(exact.count_in("aaaa", "aa", true), 2);
        assert!(exact.occurs_in("hello world", "lo w", true));
        assert_eq!(strategy(MatchKind::Regex, false).count_in("x1 y22 z", r"\d+", true), 2);
        assert_eq!(strategy(MatchKind::StartsWith, false).count_in("abab", "ab", true), 1);
    }

    #[test]
    fn validate_rejects_broken_regex() {
        let regex = strategy(MatchKind::Regex, false);
        assert!(regex.validate("a(b").is_err());
        assert!(regex.validate("a(b)").is_ok());
        assert!(StringMatchStrategy::EXACT.validate("a(b").is_ok());
    }

    #[test]
    fn validate_checks_the_anchored_form() {
        let regex = strategy(MatchKind::Regex, false);
        let commented = "(?x) a b c # trailing comment";
        assert!(build(commented, true).is_ok());
        assert!(matches!(
            regex.validate(commented),
            Err(ConfigError::InvalidRegex { pattern, .. }) if pattern == commented
        ));
        assert!(regex.validate("(?x) a b c").is_ok());
    }

    #[test]
    fn compiled_patterns_match_like_fresh_ones() {
        let regex = strategy(MatchKind::Regex, false);
        let compiled = regex
            .compile(r"ab+", false)
            .unwrap_or_else(|err| panic!("{err}"));
        assert!(compiled.is_some());
        assert!(regex.is_match_with("ABB", r"ab+", compiled.as_ref(), false));
        assert!(!regex.is_match_with("xabb", r"ab+", compiled.as_ref(), false));
        assert_eq!(regex.count_in_with("ab-abb", r"ab+", compiled.as_ref(), false), 2);
        assert!(matches!(StringMatchStrategy::EXACT.compile("a(b", true), Ok(None)));
    }

    #[test]
    fn broken_regex_never_matches() {
        let regex = strategy(MatchKind::Regex, false);
        assert!(!regex.is_match("a(b", "a(b", true));
        assert_eq!(regex.count_in("a(b", "a(b", true), 0);
    }
}
