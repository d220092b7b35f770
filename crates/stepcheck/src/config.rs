//! Process-wide settings for stepcheck.
//!
//! A setting is read from its in-process override when one is set, then from
//! its environment variable, and otherwise takes a fixed default.
//! [`EvaluatorConfig::default`] snapshots every setting, so an evaluator is
//! not affected by later changes.

use std::sync::{PoisonError, RwLock};

use crate::value::{BoolWords, parse_bool_word};

/// Environment variable consulted when no in-process override is set.
pub const EMPTY_LIST_IS_ABSENT_ENV: &str = "STEPCHECK_EMPTY_LIST_IS_ABSENT";

static EMPTY_LIST_IS_ABSENT: Switch = Switch::new(EMPTY_LIST_IS_ABSENT_ENV, false);

/// A boolean setting backed by an environment variable.
struct Switch {
    env: &'static str,
    default: bool,
    pinned: RwLock<Option<bool>>,
}

impl Switch {
    const fn new(env: &'static str, default: bool) -> Self {
        Self {
            env,
            default,
            pinned: RwLock::new(None),
        }
    }

    fn get(&self) -> bool {
        let pinned = *self.pinned.read().unwrap_or_else(PoisonError::into_inner);
        pinned.unwrap_or_else(|| self.resolve_env(std::env::var(self.env).ok().as_deref()))
    }

    fn pin(&self, value: Option<bool>) {
        *self.pinned.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    // Unrecognised values fall back to the default rather than failing.
    fn resolve_env(&self, raw: Option<&str>) -> bool {
        let Some(raw) = raw else {
            return self.default;
        };
        parse_bool_word(raw, BoolWords::Switch).unwrap_or_else(|| {
            log::warn!("ignoring unrecognised {} value '{raw}'", self.env);
            self.default
        })
    }
}

/// Whether `present` treats an empty list as a missing value.
#[must_use]
pub fn empty_list_is_absent() -> bool {
    EMPTY_LIST_IS_ABSENT.get()
}

/// Pin `empty_list_is_absent` for the current process, ignoring the
/// environment until [`clear_empty_list_is_absent_override`] is called.
pub fn set_empty_list_is_absent(enabled: bool) {
    EMPTY_LIST_IS_ABSENT.pin(Some(enabled));
}

/// Drop the in-process value so the environment applies again.
pub fn clear_empty_list_is_absent_override() {
    EMPTY_LIST_IS_ABSENT.pin(None);
}

/// Settings an [`Evaluator`](crate::Evaluator) applies to every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Treat an empty list as absent for `present` and `not-present`.
    pub empty_list_is_absent: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            empty_list_is_absent: empty_list_is_absent(),
        }
    }
}
