use serde::{Deserialize, Serialize};

use crate::error::{RespectError, RespectResult};
use crate::options::Options;

/// Default cap on the number of diagnostics a comparison returns.
pub const MAX_DIFF: usize = 10;

/// Default number of decimal places floats are rounded to before comparing.
pub const FLOAT_PRECISION: usize = 10;

/// Largest precision that still distinguishes distinct `f64` renderings.
const MAX_FLOAT_PRECISION: usize = 17;

/// Configuration for a single comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespectConfig {
    /// Maximum number of diagnostics recorded before the comparison stops
    /// descending.
    pub max_diff: usize,
    /// Decimal places both floats are rounded to before comparison.
    pub float_precision: usize,
    /// Non-default comparison policies.
    pub options: Options,
}

impl Default for RespectConfig {
    fn default() -> Self {
        Self {
            max_diff: MAX_DIFF,
            float_precision: FLOAT_PRECISION,
            options: Options::empty(),
        }
    }
}

impl RespectConfig {
    /// Default limits with the given options.
    pub fn with_options(options: Options) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Check that the limits are usable.
    pub fn validate(&self) -> RespectResult<()> {
        if self.max_diff == 0 {
            return Err(RespectError::Config(
                "max_diff must be at least 1".into(),
            ));
        }
        if self.float_precision > MAX_FLOAT_PRECISION {
            return Err(RespectError::Config(format!(
                "float_precision {} exceeds maximum of {MAX_FLOAT_PRECISION}",
                self.float_precision
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from a TOML document.
    ///
    /// ```toml
    /// max_diff = 20
    /// float_precision = 6
    /// options = "ORDER_MATTERS | LENGTH_MATTERS"
    /// ```
    pub fn from_toml_str(document: &str) -> RespectResult<Self> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }
}
