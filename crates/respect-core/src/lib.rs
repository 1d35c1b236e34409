//! Partial-match comparison engine.
//!
//! An actual value *respects* an expected pattern when everything the
//! pattern asserts holds in the actual value: record fields recursively,
//! map entries by containment, sequence elements by subset. Zero values in
//! the pattern assert nothing, so a pattern only needs to spell out what it
//! cares about.
//!
//! # Quick Start
//!
//! ```rust
//! use respect_core::{respect_serialize, Options};
//! use serde_json::json;
//!
//! let actual = json!({"name": "NeZha", "arms": ["left", "right"]});
//! let diffs = respect_serialize(&actual, &json!({"arms": ["right"]}), Options::empty()).unwrap();
//! assert!(diffs.is_empty());
//!
//! let diffs = respect_serialize(&actual, &json!({"name": "Ao"}), Options::empty()).unwrap();
//! assert_eq!(diffs.into_vec(), ["map[name]: NeZha != Ao"]);
//! ```
//!
//! # Key Types
//!
//! - [`respect`] / [`respect_with`] / [`Respect`] -- Entry points
//! - [`Options`] -- Ordered, length-sensitive and zero-value policies
//! - [`RespectConfig`] -- Diagnostic cap, float precision and options
//! - [`DiffList`] -- Bounded, path-qualified diagnostics
//!
//! Comparison is depth-first with no cycle detection: inputs containing
//! reference cycles recurse until the stack is exhausted.

mod comparator;
pub mod config;
pub mod diff;
pub mod error;
pub mod options;
pub mod path;
pub mod respect;
mod sequence;

pub use config::{RespectConfig, FLOAT_PRECISION, MAX_DIFF};
pub use diff::{DiffList, Op, Recorder};
pub use error::{RespectError, RespectResult};
pub use options::Options;
pub use path::{Path, Segment};
pub use respect::{respect, respect_serialize, respect_with, Respect};
pub use respect_types::{to_value, ToValue, Value};
