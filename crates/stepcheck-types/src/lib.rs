//! Canonical tag sets shared by the stepcheck runtime and command line.
//!
//! The crate owns the closed vocabularies of the assertion language: value
//! types, comparison operators and text-match kinds. Each tag parses from the
//! lenient spelling scenario authors write and renders back to one canonical
//! token, so the runtime and the CLI agree on a single definition.

mod name;
mod operator;
mod strategy;
mod value_type;

pub use name::normalise_name;
pub use operator::{BUILTIN_OPERATOR_TOKENS, ComparisonOperator, UnknownOperator};
pub use strategy::{BUILTIN_STRATEGY_NAMES, MatchKind, StrategyTag, UnknownStrategy};
pub use value_type::{ScalarType, UnknownValueType, ValueType};
