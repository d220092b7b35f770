//! Operator-token and strategy-name lookup tables.
//! The built-in entries come from `stepcheck-types`; hosts add spellings at
//! link time with [`operator_alias!`](crate::operator_alias) and
//! [`strategy_alias!`](crate::strategy_alias). Each table is assembled once,
//! on first use, and is read-only afterwards, so parallel scenario workers
//! share it without locking.

use std::collections::HashMap;
use std::sync::LazyLock;

use inventory::iter;
use stepcheck_types::{
    BUILTIN_OPERATOR_TOKENS, BUILTIN_STRATEGY_NAMES, ComparisonOperator, StrategyTag,
    normalise_name,
};

use crate::error::ConfigError;
use crate::strategy::StringMatchStrategy;

/// Host-supplied operator spelling.
#[derive(Debug)]
pub struct OperatorAlias {
    /// Token as scenario authors write it.
    pub token: &'static str,
    /// Operator the token resolves to.
    pub operator: ComparisonOperator,
    /// Source file of the registration.
    pub file: &'static str,
    /// Line of the registration.
    pub line: u32,
}

/// Host-supplied strategy name.
#[derive(Debug)]
pub struct StrategyAlias {
    /// Name as scenario authors write it.
    pub name: &'static str,
    /// Strategy the name resolves to.
    pub strategy: StrategyTag,
    /// Source file of the registration.
    pub file: &'static str,
    /// Line of the registration.
    pub line: u32,
}

inventory::collect!(OperatorAlias);
inventory::collect!(StrategyAlias);

/// Register an extra operator token.
///
/// Tokens are matched after [`normalise_name`] folding. A token that clashes
/// with a built-in spelling is ignored with a warning.
///
/// # Examples
///
/// ```
/// use stepcheck::{lookup_operator, operator_alias};
/// use stepcheck_types::ComparisonOperator;
///
/// operator_alias!("is at least", ComparisonOperator::GreaterOrEqual);
///
/// fn main() {
///     assert_eq!(
///         lookup_operator("IS AT LEAST"),
///         Ok(ComparisonOperator::GreaterOrEqual)
///     );
/// }
/// ```
#[macro_export]
macro_rules! operator_alias {
    ($token:expr, $operator:expr $(,)?) => {
        const _: () = {
            $crate::submit! {
                $crate::registry::OperatorAlias {
                    token: $token,
                    operator: $operator,
                    file: file!(),
                    line: line!(),
                }
            }
        };
    };
}

/// Register an extra strategy name.
///
/// # Examples
///
/// ```
/// use stepcheck::{StringMatchStrategy, strategy_alias};
/// use stepcheck_types::{MatchKind, StrategyTag};
///
/// strategy_alias!("prefix", StrategyTag::new(MatchKind::StartsWith, false));
///
/// fn main() {
///     let strategy = StringMatchStrategy::resolve("Prefix").unwrap();
///     assert_eq!(strategy.kind(), MatchKind::StartsWith);
/// }
/// ```
#[macro_export]
macro_rules! strategy_alias {
    ($name:expr, $strategy:expr $(,)?) => {
        const _: () = {
            $crate::submit! {
                $crate::registry::StrategyAlias {
                    name: $name,
                    strategy: $strategy,
                    file: file!(),
                    line: line!(),
                }
            }
        };
    };
}

fn build_table<T: Copy + PartialEq + std::fmt::Debug>(
    kind: &str,
    builtins: &[(&'static str, T)],
    aliases: impl Iterator<Item = (&'static str, T, &'static str, u32)>,
) -> HashMap<String, T> {
    let mut table: HashMap<String, T> = builtins
        .iter()
        .map(|(key, value)| ((*key).to_string(), *value))
        .collect();
    for (raw, value, file, line) in aliases {
        let key = normalise_name(raw);
        match table.get(&key) {
            Some(existing) if *existing != value => log::warn!(
                "{kind} alias '{raw}' at {file}:{line} clashes with {existing:?}; keeping the existing entry"
            ),
            Some(_) => {}
            None => {
                log::debug!("registered {kind} alias '{raw}' -> {value:?}");
                table.insert(key, value);
            }
        }
    }
    table
}

static OPERATORS: LazyLock<HashMap<String, ComparisonOperator>> = LazyLock::new(|| {
    build_table(
        "operator",
        BUILTIN_OPERATOR_TOKENS,
        iter::<OperatorAlias>
            .into_iter()
            .map(|alias| (alias.token, alias.operator, alias.file, alias.line)),
    )
});

static STRATEGIES: LazyLock<HashMap<String, StrategyTag>> = LazyLock::new(|| {
    build_table(
        "strategy",
        BUILTIN_STRATEGY_NAMES,
        iter::<StrategyAlias>
            .into_iter()
            .map(|alias| (alias.name, alias.strategy, alias.file, alias.line)),
    )
});

/// Resolve an operator token (case and whitespace insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownOperator`] when the token is not registered.
pub fn lookup_operator(token: &str) -> Result<ComparisonOperator, ConfigError> {
    OPERATORS
        .get(&normalise_name(token))
        .copied()
        .ok_or_else(|| ConfigError::UnknownOperator {
            token: token.trim().to_string(),
        })
}

/// Resolve a strategy name (case, whitespace, `-` and `_` insensitive).
///
/// # Errors
///
/// Returns [`ConfigError::UnknownStrategy`] when the name is not registered.
pub fn lookup_strategy(name: &str) -> Result<StringMatchStrategy, ConfigError> {
    STRATEGIES
        .get(&normalise_name(name))
        .copied()
        .map(StringMatchStrategy::new)
        .ok_or_else(|| ConfigError::UnknownStrategy {
            name: name.trim().to_string(),
        })
}

/// All operator spellings, sorted by token.
#[must_use]
pub fn operator_tokens() -> Vec<(String, ComparisonOperator)> {
    let mut tokens: Vec<_> = OPERATORS
        .iter()
        .map(|(token, op)| (token.clone(), *op))
        .collect();
    tokens.sort_by(|a, b| a.0.cmp(&b.0));
    tokens
}

/// All strategy names, sorted by name.
#[must_use]
pub fn strategy_names() -> Vec<(String, StrategyTag)> {
    let mut names: Vec<_> = STRATEGIES
        .iter()
        .map(|(name, tag)| (name.clone(), *tag))
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepcheck_types::MatchKind;

    crate::operator_alias!("eq", ComparisonOperator::Equals);
    crate::operator_alias!("!=", ComparisonOperator::Equals);
    crate::strategy_alias!("like", StrategyTag::new(MatchKind::Contains, true));

    #[test]
    fn resolves_builtin_and_registered_tokens() {
        assert_eq!(lookup_operator(" EQ "), Ok(ComparisonOperator::Equals));
        assert_eq!(lookup_operator("not contains"), Ok(ComparisonOperator::NotContains));
    }

    #[test]
    fn clashing_alias_keeps_builtin() {
        assert_eq!(lookup_operator("!="), Ok(ComparisonOperator::NotEquals));
    }

    #[test]
    fn unknown_token_is_config_error() {
        assert_eq!(
            lookup_operator(" ~ "),
            Err(ConfigError::UnknownOperator { token: "~".into() })
        );
    }

    #[test]
    fn resolves_registered_strategy() {
        let like = lookup_strategy("LIKE").unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(like.tag(), StrategyTag::new(MatchKind::Contains, true));
        assert!(matches!(
            lookup_strategy("fuzzy"),
            Err(ConfigError::UnknownStrategy { name }) if name == "fuzzy"
        ));
    }

    #[test]
    fn listings_are_sorted_and_complete() {
        let tokens = operator_tokens();
        assert!(tokens.windows(2).all(|pair| match pair {
            [a, b] => a.0 <= b.0,
            _ => true,
        }));
        assert!(tokens.iter().any(|(token, _)| token == "eq"));
        assert!(strategy_names().iter().any(|(name, _)| name == "like"));
    }
}
