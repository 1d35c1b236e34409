//! Entry points.

use respect_types::{to_value, Value};
use serde::Serialize;

use crate::comparator::Comparator;
use crate::config::RespectConfig;
use crate::diff::{DiffList, NIL_POINTER};
use crate::error::RespectResult;
use crate::options::Options;

/// Check whether `actual` respects `expected` under the default limits.
///
/// Returns the divergences found, at most [`MAX_DIFF`](crate::MAX_DIFF) of
/// them. An empty list means `actual` respects `expected`.
pub fn respect(actual: &Value, expected: &Value, options: Options) -> DiffList {
    respect_with(&RespectConfig::with_options(options), actual, expected)
}

/// Like [`respect`], with explicit limits.
///
/// Nil inputs are settled here without entering the recursive comparison:
/// two nils respect each other, and a nil actual never respects a present
/// pattern. A nil pattern asserts nothing unless `ZERO_VALUE_MATTERS` is
/// set, in which case it requires a nil actual.
pub fn respect_with(config: &RespectConfig, actual: &Value, expected: &Value) -> DiffList {
    let mut comparator = Comparator::new(config);
    match (actual.is_nil(), expected.is_nil()) {
        (true, true) => {}
        (true, false) => comparator.recorder.mismatch(NIL_POINTER, expected),
        (false, true) => {
            if config.options.zero_value_matters() {
                comparator.recorder.mismatch(actual, NIL_POINTER);
            }
        }
        (false, false) => comparator.respect(actual, expected),
    }
    let diffs = comparator.finish();
    tracing::debug!(
        options = ?config.options,
        diffs = diffs.len(),
        "respect comparison finished"
    );
    diffs
}

/// Compare any two serializable values.
pub fn respect_serialize<A, E>(actual: &A, expected: &E, options: Options) -> RespectResult<DiffList>
where
    A: ?Sized + Serialize,
    E: ?Sized + Serialize,
{
    let actual = to_value(actual)?;
    let expected = to_value(expected)?;
    Ok(respect(&actual, &expected, options))
}

/// A comparison engine bound to a validated configuration.
///
/// Holds no state between calls; one engine may be shared freely.
#[derive(Clone, Debug, Default)]
pub struct Respect {
    config: RespectConfig,
}

impl Respect {
    pub fn new(config: RespectConfig) -> RespectResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// An engine with default limits.
    pub fn with_options(options: Options) -> Self {
        Self {
            config: RespectConfig::with_options(options),
        }
    }

    pub fn config(&self) -> &RespectConfig {
        &self.config
    }

    pub fn compare(&self, actual: &Value, expected: &Value) -> DiffList {
        respect_with(&self.config, actual, expected)
    }

    pub fn compare_serialize<A, E>(&self, actual: &A, expected: &E) -> RespectResult<DiffList>
    where
        A: ?Sized + Serialize,
        E: ?Sized + Serialize,
    {
        Ok(self.compare(&to_value(actual)?, &to_value(expected)?))
    }
}
