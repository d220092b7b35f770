//! Operator dispatch over coerced operands.

use std::cmp::Ordering;

use stepcheck_types::ComparisonOperator;

use crate::coercion::coerce_scalars;
use crate::config::EvaluatorConfig;
use crate::spec::MatchSpec;
use crate::value::{List, Scalar, TypedValue};

/// Result of applying an operator to a coerced pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Verdict {
    pub(crate) passed: bool,
    pub(crate) detail: Option<String>,
}

impl Verdict {
    const fn pass() -> Self {
        Self {
            passed: true,
            detail: None,
        }
    }

    fn fail_with(detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            detail: Some(detail.into()),
        }
    }

    const fn from_bool(passed: bool) -> Self {
        Self {
            passed,
            detail: None,
        }
    }

    // Details describe why the positive form failed, so they do not carry
    // over to the negation.
    fn negate(self) -> Self {
        Self::from_bool(!self.passed)
    }
}

const ABSENT: &str = "actual value is absent";
const NON_NUMERIC: &str = "non-numeric operand";

/// Apply `operator` to an already coerced pair.
pub(crate) fn compare(
    operator: ComparisonOperator,
    actual: &TypedValue,
    expected: &TypedValue,
    spec: &MatchSpec,
    config: &EvaluatorConfig,
) -> Verdict {
    let verdict = match operator {
        ComparisonOperator::Equals | ComparisonOperator::NotEquals => {
            equals(actual, expected, spec)
        }
        ComparisonOperator::Contains | ComparisonOperator::NotContains => {
            contains(actual, expected, spec)
        }
        ComparisonOperator::Present | ComparisonOperator::NotPresent => present(actual, config),
        ComparisonOperator::GreaterThan => relational(actual, expected, Ordering::is_gt),
        ComparisonOperator::GreaterOrEqual => relational(actual, expected, Ordering::is_ge),
        ComparisonOperator::LessThan => relational(actual, expected, Ordering::is_lt),
        ComparisonOperator::LessOrEqual => relational(actual, expected, Ordering::is_le),
    };
    if operator.is_negated() {
        verdict.negate()
    } else {
        verdict
    }
}

fn present(actual: &TypedValue, config: &EvaluatorConfig) -> Verdict {
    match actual {
        TypedValue::Null => Verdict::fail_with(ABSENT),
        TypedValue::List(list) if list.is_empty() && config.empty_list_is_absent => {
            Verdict::fail_with("actual list is empty")
        }
        TypedValue::Scalar(_) | TypedValue::List(_) => Verdict::pass(),
    }
}

fn relational(actual: &TypedValue, expected: &TypedValue, accept: fn(Ordering) -> bool) -> Verdict {
    let (TypedValue::Scalar(left), TypedValue::Scalar(right)) = (actual, expected) else {
        return if actual.is_null() {
            Verdict::fail_with(ABSENT)
        } else {
            Verdict::fail_with(NON_NUMERIC)
        };
    };
    match (left.as_number(), right.as_number()) {
        (Some(left), Some(right)) => Verdict::from_bool(accept(left.cmp(&right))),
        _ => Verdict::fail_with(NON_NUMERIC),
    }
}

fn equals(actual: &TypedValue, expected: &TypedValue, spec: &MatchSpec) -> Verdict {
    match (actual, expected) {
        (TypedValue::Null, TypedValue::Null) => Verdict::pass(),
        (TypedValue::Null, _) => Verdict::fail_with(ABSENT),
        (_, TypedValue::Null) => Verdict::fail_with("no expected value given"),
        (TypedValue::Scalar(left), TypedValue::Scalar(right)) => {
            Verdict::from_bool(scalars_match(left, right, spec))
        }
        (TypedValue::List(left), TypedValue::List(right)) => lists_equal(left, right, spec),
        (TypedValue::List(_), TypedValue::Scalar(_))
        | (TypedValue::Scalar(_), TypedValue::List(_)) => {
            Verdict::fail_with("list compared with scalar")
        }
    }
}

fn lists_equal(actual: &List, expected: &List, spec: &MatchSpec) -> Verdict {
    if actual.len() != expected.len() {
        return Verdict::fail_with(format!(
            "length differs: {} actual vs {} expected",
            actual.len(),
            expected.len()
        ));
    }
    let actual = actual.scalars();
    let expected = expected.scalars();
    let passed = if spec.ordered() {
        actual
            .iter()
            .zip(&expected)
            .all(|(left, right)| scalars_match(left, right, spec))
    } else {
        max_matching(&adjacency(&expected, &actual, spec), actual.len()) == expected.len()
    };
    Verdict::from_bool(passed)
}

fn contains(actual: &TypedValue, expected: &TypedValue, spec: &MatchSpec) -> Verdict {
    match (actual, expected) {
        (TypedValue::Null, _) => Verdict::fail_with(ABSENT),
        (_, TypedValue::Null) => Verdict::fail_with("no expected value given"),
        (TypedValue::List(list), TypedValue::Scalar(item)) => {
            let count = list
                .scalars()
                .iter()
                .filter(|candidate| scalars_match(candidate, item, spec))
                .count();
            counted(count, spec)
        }
        (TypedValue::List(list), TypedValue::List(items)) => list_contains(list, items, spec),
        (TypedValue::Scalar(text), TypedValue::Scalar(pattern)) => {
            let count = spec.text_occurrences(&text.render(), &pattern.render());
            counted(count, spec)
        }
        (TypedValue::Scalar(item), TypedValue::List(items)) => {
            list_contains(&List::singleton(item.clone()), items, spec)
        }
    }
}

fn counted(count: usize, spec: &MatchSpec) -> Verdict {
    match spec.occurrence() {
        Some(required) if required == count => Verdict::pass(),
        Some(required) => {
            Verdict::fail_with(format!("found {count} occurrence(s), expected {required}"))
        }
        None => Verdict::from_bool(count > 0),
    }
}

fn list_contains(actual: &List, expected: &List, spec: &MatchSpec) -> Verdict {
    let actual = actual.scalars();
    let expected = expected.scalars();
    if let Some(required) = spec.occurrence() {
        let miscounted = expected.iter().find_map(|item| {
            let count = actual
                .iter()
                .filter(|candidate| scalars_match(candidate, item, spec))
                .count();
            (count != required).then_some((item, count))
        });
        return match miscounted {
            Some((item, count)) => Verdict::fail_with(format!(
                "{item} found {count} time(s), expected {required}"
            )),
            None => Verdict::pass(),
        };
    }
    let passed = if spec.ordered() {
        let mut remaining = actual.iter();
        expected
            .iter()
            .all(|item| remaining.any(|candidate| scalars_match(candidate, item, spec)))
    } else {
        max_matching(&adjacency(&expected, &actual, spec), actual.len()) == expected.len()
    };
    Verdict::from_bool(passed)
}

/// Equality-style match of one actual scalar against one expected scalar.
pub(crate) fn scalars_match(actual: &Scalar, expected: &Scalar, spec: &MatchSpec) -> bool {
    let (actual, expected) = coerce_scalars(
        actual.clone(),
        expected.clone(),
        spec.strategy().is_textual(),
    );
    match (&actual, &expected) {
        (Scalar::Boolean(left), Scalar::Boolean(right)) => left == right,
        _ => match (actual.as_number(), expected.as_number()) {
            (Some(left), Some(right)) if !spec.strategy().is_textual() => left == right,
            _ => spec.text_matches(&actual.render(), &expected.render()),
        },
    }
}

// For each expected item, the indices of actual items it matches.
fn adjacency(expected: &[Scalar], actual: &[Scalar], spec: &MatchSpec) -> Vec<Vec<usize>> {
    expected
        .iter()
        .map(|item| {
            actual
                .iter()
                .enumerate()
                .filter(|(_, candidate)| scalars_match(candidate, item, spec))
                .map(|(index, _)| index)
                .collect()
        })
        .collect()
}

/// Size of a maximum bipartite matching between expected items and actual
/// slots (Kuhn's augmenting paths).
fn max_matching(adjacency: &[Vec<usize>], slots: usize) -> usize {
    let mut owner: Vec<Option<usize>> = vec![None; slots];
    let mut matched = 0;
    for left in 0..adjacency.len() {
        let mut seen = vec![false; slots];
        if augment(left, adjacency, &mut owner, &mut seen) {
            matched += 1;
        }
    }
    matched
}

fn augment(
    left: usize,
    adjacency: &[Vec<usize>],
    owner: &mut [Option<usize>],
    seen: &mut [bool],
) -> bool {
    let Some(edges) = adjacency.get(left) else {
        return false;
    };
    for &slot in edges {
        match seen.get_mut(slot) {
            Some(visited) if !*visited => *visited = true,
            _ => continue,
        }
        let free = match owner.get(slot).copied().flatten() {
            None => true,
            Some(previous) => augment(previous, adjacency, owner, seen),
        };
        if free {
            if let Some(entry) = owner.get_mut(slot) {
                *entry = Some(left);
            }
            return true;
        }
    }
    false
}
