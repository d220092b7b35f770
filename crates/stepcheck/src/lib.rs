//! Core library for `stepcheck`.
//! This crate decides whether a value read during a behaviour test satisfies
//! a comparison written in the scenario. Assertion steps use raise-mode and
//! fail the scenario on a mismatch; conditional steps use report-mode and
//! branch on a plain boolean.
//!
//! ```
//! use serde_json::json;
//! use stepcheck::{Evaluator, RawMatchSpec, TypedPath};
//!
//! let evaluator = Evaluator::default();
//! let tags = json!(["a", "b", "c"]);
//! let path = TypedPath::parse("tags");
//!
//! let both = RawMatchSpec::from(r#"{"ev": ["a", "c"]}"#);
//! assert!(evaluator.check(&path, &tags, "contains", &both));
//! assert!(evaluator.assert(&path, &tags, "contains", &RawMatchSpec::from("d")).is_err());
//! ```

pub use inventory::submit;

mod batch;
pub mod coercion;
mod compare;
pub mod config;
pub mod datatable;
mod error;
mod evaluator;
mod number;
pub mod registry;
pub mod reporting;
mod source;
mod spec;
mod strategy;
mod value;

pub use batch::{BatchEvaluator, CheckRow};
pub use config::EvaluatorConfig;
pub use error::{BatchError, ConfigError, EvaluationError};
pub use evaluator::{EvaluationOutcome, Evaluator, Mode};
pub use number::Number;
pub use registry::{OperatorAlias, StrategyAlias, lookup_operator, lookup_strategy};
pub use source::ValueSource;
pub use spec::{MatchSpec, RawMatchSpec};
pub use strategy::StringMatchStrategy;
pub use value::{List, RawValue, Scalar, TypedPath, TypedValue, ValueOrigin};

pub use stepcheck_types::{ComparisonOperator, MatchKind, ScalarType, StrategyTag, ValueType};
