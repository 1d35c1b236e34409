//! Test assertions built on the respect engine.
//!
//! [`RespectMatcher`] holds a pattern and reports why an actual value does
//! not respect it. [`assert_respects!`] and [`assert_not_respects!`] wrap it
//! for any pair of `Serialize` values.
//!
//! ```rust
//! use respect_assert::{assert_not_respects, assert_respects, Options};
//! use serde_json::json;
//!
//! let actual = json!({"arms": ["left", "right"], "age": 3});
//! assert_respects!(actual, json!({"arms": ["right"]}));
//! assert_not_respects!(actual, json!({"arms": ["right", "left"]}), Options::ORDER_MATTERS);
//! ```

use respect_core::{DiffList, Respect, RespectConfig, RespectResult};
use respect_types::{to_value, Value};
use serde::Serialize;

pub use respect_core::Options;

/// Prefix of every failure message.
const DIFF_HEADER: &str = "Diff:";

/// A reusable assertion against one pattern.
///
/// Each call to [`matches`](Self::matches) replaces the diagnostics of the
/// previous one.
#[derive(Debug)]
pub struct RespectMatcher {
    expected: Value,
    engine: Respect,
    diffs: DiffList,
}

impl RespectMatcher {
    pub fn new(expected: Value, options: Options) -> Self {
        Self {
            expected,
            engine: Respect::with_options(options),
            diffs: DiffList::new(),
        }
    }

    /// Build a matcher from any serializable pattern.
    pub fn from_serialize<E: ?Sized + Serialize>(expected: &E, options: Options) -> RespectResult<Self> {
        Ok(Self::new(to_value(expected)?, options))
    }

    /// Build a matcher with explicit limits.
    pub fn with_config(expected: Value, config: RespectConfig) -> RespectResult<Self> {
        Ok(Self {
            expected,
            engine: Respect::new(config)?,
            diffs: DiffList::new(),
        })
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }

    /// Whether `actual` respects the pattern.
    pub fn matches(&mut self, actual: &Value) -> bool {
        self.diffs = self.engine.compare(actual, &self.expected);
        self.diffs.is_empty()
    }

    pub fn matches_serialize<A: ?Sized + Serialize>(&mut self, actual: &A) -> RespectResult<bool> {
        Ok(self.matches(&to_value(actual)?))
    }

    /// Diagnostics of the last [`matches`](Self::matches) call.
    pub fn diffs(&self) -> &DiffList {
        &self.diffs
    }

    pub fn failure_message(&self) -> String {
        format!("{DIFF_HEADER}\n{}", self.diffs)
    }

    pub fn negated_failure_message(&self) -> String {
        format!("{DIFF_HEADER}\n{}", self.diffs)
    }
}

#[doc(hidden)]
#[track_caller]
pub fn __check<A, E>(actual: &A, expected: &E, options: Options, respects: bool)
where
    A: ?Sized + Serialize,
    E: ?Sized + Serialize,
{
    let mut matcher = match RespectMatcher::from_serialize(expected, options) {
        Ok(m) => m,
        Err(e) => panic!("pattern cannot be converted: {e}"),
    };
    let matched = match matcher.matches_serialize(actual) {
        Ok(m) => m,
        Err(e) => panic!("actual value cannot be converted: {e}"),
    };
    match (matched, respects) {
        (false, true) => panic!("{}", matcher.failure_message()),
        (true, false) => panic!(
            "actual value respects the pattern\n{}",
            matcher.negated_failure_message()
        ),
        _ => {}
    }
}

/// Assert that `actual` respects `expected`, panicking with the
/// diagnostics otherwise.
#[macro_export]
macro_rules! assert_respects {
    ($actual:expr, $expected:expr $(,)?) => {
        $crate::assert_respects!($actual, $expected, $crate::Options::empty())
    };
    ($actual:expr, $expected:expr, $options:expr $(,)?) => {
        $crate::__check(&$actual, &$expected, $options, true)
    };
}

/// Assert that `actual` does not respect `expected`.
#[macro_export]
macro_rules! assert_not_respects {
    ($actual:expr, $expected:expr $(,)?) => {
        $crate::assert_not_respects!($actual, $expected, $crate::Options::empty())
    };
    ($actual:expr, $expected:expr, $options:expr $(,)?) => {
        $crate::__check(&$actual, &$expected, $options, false)
    };
}
