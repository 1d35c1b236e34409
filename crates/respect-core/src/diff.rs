//! Bounded, path-qualified diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::{Path, Segment};

/// Stands in for a missing actual value.
pub const NIL_POINTER: &str = "<nil pointer>";
/// Stands in for a nil actual map.
pub const NIL_MAP: &str = "<nil map>";
/// Stands in for a nil actual sequence.
pub const NIL_SLICE: &str = "<nil slice>";
/// The actual map lacks a key the pattern has.
pub const NO_KEY: &str = "<does not have key>";
/// No actual element matched a pattern element.
pub const NOT_FOUND: &str = "<not found>";
/// An identifier field with nothing in it.
pub const NO_VALUE: &str = "<no value>";
/// No text field was usable to correlate record elements.
pub const NO_IDENTIFIER: &str = "<non valid field identifier was found>";

/// Comparison operator in a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Ne,
    Lt,
    Gt,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
        })
    }
}

// ---------------------------------------------------------------------------
// DiffList
// ---------------------------------------------------------------------------

/// The outcome of a comparison: diagnostics in discovery order.
///
/// Empty means the actual value respects the pattern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffList {
    entries: Vec<String>,
}

impl DiffList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if there are no divergences.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

/// One diagnostic per line.
impl fmt::Display for DiffList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entries.join("\n"))
    }
}

impl IntoIterator for DiffList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Recorder
// ---------------------------------------------------------------------------

/// Accumulates diagnostics for one comparison.
///
/// Every branch of the traversal shares one recorder, so the cap applies to
/// the whole comparison. Entries past the cap are dropped.
#[derive(Debug)]
pub struct Recorder {
    path: Path,
    entries: Vec<String>,
    max_diff: usize,
}

impl Recorder {
    pub fn new(max_diff: usize) -> Self {
        Self {
            path: Path::new(),
            entries: Vec::new(),
            max_diff: max_diff.max(1),
        }
    }

    pub fn push(&mut self, segment: Segment) {
        self.path.push(segment);
    }

    pub fn pop(&mut self) {
        self.path.pop();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` once the cap is reached.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_diff
    }

    /// Record `message`, prefixed by the current path when there is one.
    pub fn record(&mut self, message: impl fmt::Display) {
        if self.is_full() {
            tracing::trace!(%message, "diff cap reached, dropping divergence");
            return;
        }
        let entry = if self.path.is_empty() {
            message.to_string()
        } else {
            format!("{}: {message}", self.path)
        };
        tracing::trace!(diff = %entry, "recorded divergence");
        self.entries.push(entry);
    }

    /// Record `lhs op rhs`.
    pub fn compare(&mut self, lhs: impl fmt::Display, op: Op, rhs: impl fmt::Display) {
        self.record(format_args!("{lhs} {op} {rhs}"));
    }

    /// Record `lhs != rhs`.
    pub fn mismatch(&mut self, lhs: impl fmt::Display, rhs: impl fmt::Display) {
        self.compare(lhs, Op::Ne, rhs);
    }

    pub fn finish(self) -> DiffList {
        debug_assert!(self.path.is_empty(), "unbalanced path: {}", self.path);
        DiffList {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_diff_has_no_prefix() {
        let mut recorder = Recorder::new(10);
        recorder.mismatch(1, 2);
        assert_eq!(recorder.finish().into_vec(), ["1 != 2"]);
    }

    #[test]
    fn path_prefix() {
        let mut recorder = Recorder::new(10);
        recorder.push(Segment::Field("Arms".into()));
        recorder.push(Segment::Len);
        recorder.compare(1, Op::Lt, 2);
        recorder.pop();
        recorder.pop();
        assert_eq!(recorder.finish().into_vec(), ["Arms.<len>: 1 < 2"]);
    }

    #[test]
    fn cap_is_enforced() {
        let mut recorder = Recorder::new(3);
        for i in 0..5 {
            recorder.record(i);
        }
        assert!(recorder.is_full());
        let diffs = recorder.finish();
        assert_eq!(diffs.len(), 3);
        assert_eq!(diffs.to_string(), "0\n1\n2");
    }

    #[test]
    fn zero_cap_still_records_one() {
        let mut recorder = Recorder::new(0);
        recorder.record(NO_IDENTIFIER);
        assert_eq!(recorder.len(), 1);
    }
}
