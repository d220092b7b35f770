//! Collaborator boundary: where batch checks read their actual values.
//!
//! A JSON document answers JSON Pointers (`/items/0/name`) and dotted paths
//! (`items[0].name`, `$.items[*].name`). A `[*]` step projects every element,
//! so the path yields a list. A map of named values acts as a variable store;
//! a dotted path whose first segment names a variable descends into it.

use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::value::RawValue;

/// Source of actual values for [`BatchEvaluator`](crate::BatchEvaluator).
///
/// Returning `None` means "no value obtainable"; the engine treats it as
/// null.
pub trait ValueSource {
    /// Read the value at `path`.
    fn value_at(&self, path: &str) -> Option<RawValue>;
}

impl<T: ValueSource + ?Sized> ValueSource for &T {
    fn value_at(&self, path: &str) -> Option<RawValue> {
        (**self).value_at(path)
    }
}

impl ValueSource for RawValue {
    fn value_at(&self, path: &str) -> Option<RawValue> {
        let path = path.trim();
        if path.is_empty() || path.starts_with('/') {
            return self.pointer(path).cloned();
        }
        let dotted = path.strip_prefix('$').map_or(path, |rest| {
            rest.strip_prefix('.').unwrap_or(rest)
        });
        resolve(self, &parse_steps(dotted)?)
    }
}

impl<S: BuildHasher> ValueSource for HashMap<String, RawValue, S> {
    fn value_at(&self, path: &str) -> Option<RawValue> {
        let path = path.trim();
        if let Some(value) = self.get(path) {
            return Some(value.clone());
        }
        let steps = parse_steps(path)?;
        let (Step::Field(name), rest) = steps.split_first()? else {
            return None;
        };
        resolve(self.get(name.as_str())?, rest)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Field(String),
    Index(usize),
    Each,
}

fn parse_steps(path: &str) -> Option<Vec<Step>> {
    let mut steps = Vec::new();
    if path.is_empty() {
        return Some(steps);
    }
    for segment in path.split('.') {
        let (name, brackets) = match segment.split_once('[') {
            Some((name, rest)) => (name, Some(rest.strip_suffix(']')?)),
            None => (segment, None),
        };
        if !name.is_empty() {
            steps.push(Step::Field(name.to_string()));
        } else if brackets.is_none() {
            return None;
        }
        for index in brackets.into_iter().flat_map(|inner| inner.split("][")) {
            steps.push(match index.trim() {
                "*" => Step::Each,
                number => Step::Index(number.parse().ok()?),
            });
        }
    }
    Some(steps)
}

fn resolve(root: &RawValue, steps: &[Step]) -> Option<RawValue> {
    let mut nodes = vec![root];
    let mut projected = false;
    for step in steps {
        nodes = match step {
            Step::Field(name) => nodes
                .into_iter()
                .filter_map(|node| node.get(name.as_str()))
                .collect(),
            Step::Index(index) => nodes.into_iter().filter_map(|node| node.get(*index)).collect(),
            Step::Each => {
                projected = true;
                nodes
                    .into_iter()
                    .filter_map(RawValue::as_array)
                    .flatten()
                    .collect()
            }
        };
        if nodes.is_empty() && !projected {
            return None;
        }
    }
    if projected {
        Some(RawValue::Array(nodes.into_iter().cloned().collect()))
    } else {
        nodes.first().map(|node| (*node).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn order() -> RawValue {
        json!({
            "id": "A-17",
            "total": 42.5,
            "items": [
                {"name": "tea", "qty": 2},
                {"name": "cake", "qty": 1},
                {"qty": 3}
            ]
        })
    }

    #[rstest]
    #[case("/id", Some(json!("A-17")))]
    #[case("/items/2/qty", Some(json!(3)))]
    #[case("total", Some(json!(42.5)))]
    #[case("items[1].name", Some(json!("cake")))]
    #[case("$.items[0].qty", Some(json!(2)))]
    #[case("items[*].name", Some(json!(["tea", "cake"])))]
    #[case("items[*].colour", Some(json!([])))]
    #[case("items[9].name", None)]
    #[case("missing", None)]
    #[case("items[x]", None)]
    fn resolves_document_paths(
        order: RawValue,
        #[case] path: &str,
        #[case] expected: Option<RawValue>,
    ) {
        assert_eq!(order.value_at(path), expected);
    }

    #[rstest]
    fn variables_resolve_by_name_then_by_path(order: RawValue) {
        let mut vars = HashMap::new();
        vars.insert("order".to_string(), order);
        vars.insert("user.name".to_string(), json!("ada"));
        assert_eq!(vars.value_at("user.name"), Some(json!("ada")));
        assert_eq!(vars.value_at("order.items[0].name"), Some(json!("tea")));
        assert_eq!(vars.value_at("nobody"), None);
        assert_eq!((&vars).value_at(" order.id "), Some(json!("A-17")));
    }
}
