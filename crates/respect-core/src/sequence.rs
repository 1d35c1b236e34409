//! Subset matching for growable sequences.
//!
//! By default a pattern sequence is a subset of the actual one and element
//! order is free. Each pattern element is then paired with an actual element
//! of the same kind:
//!
//! - records are keyed on their non-empty text fields and maps on their
//!   non-empty text entries, taken from the first pattern element of that
//!   kind; each pattern element is compared in full against the first actual
//!   element with the same key
//! - scalars are matched as a multiset, each actual element used once
//! - nil pattern elements assert nothing
//!
//! Nested sequences and arrays have no correlation key, so a pattern holding
//! them is reported as ambiguous unless `ORDER_MATTERS` is set.

use std::sync::Arc;

use respect_types::{Data, Kind, MapEntries, Record, Type, Value};

use crate::comparator::Comparator;
use crate::diff::{Op, NIL_SLICE, NOT_FOUND, NO_IDENTIFIER, NO_VALUE};
use crate::path::Segment;

impl Comparator<'_> {
    pub(crate) fn respect_sequence(
        &mut self,
        actual: Option<&Arc<Vec<Value>>>,
        expected: &Value,
        expected_items: Option<&Arc<Vec<Value>>>,
    ) {
        let Some(expected_items) = expected_items.filter(|items| !items.is_empty()) else {
            return;
        };
        let Some(actual_items) = actual else {
            self.recorder.mismatch(NIL_SLICE, expected);
            return;
        };

        let (na, ne) = (actual_items.len(), expected_items.len());
        if na == ne && Arc::ptr_eq(actual_items, expected_items) {
            return;
        }
        if na < ne {
            self.within(Segment::Len, |c| c.recorder.compare(na, Op::Lt, ne));
            return;
        }
        if na > ne && self.config.options.length_matters() {
            // Reported, but the elements are still compared.
            self.within(Segment::Len, |c| c.recorder.compare(na, Op::Gt, ne));
        }

        if self.config.options.order_matters() || (ne <= 1 && na == 1) {
            self.respect_in_order(actual_items, expected_items);
        } else {
            self.respect_any_order(actual_items, expected_items);
        }
    }

    fn respect_in_order(&mut self, actual: &[Value], expected: &[Value]) {
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            self.within(Segment::Index(i), |c| c.respect(a, e));
            if self.recorder.is_full() {
                break;
            }
        }
    }

    fn respect_any_order(&mut self, actual: &[Value], expected: &[Value]) {
        let wanted: Vec<&Value> = expected
            .iter()
            .map(Value::resolve)
            .filter(|v| !asserts_nothing(v))
            .collect();

        if let Some(nested) = wanted
            .iter()
            .find(|v| matches!(v.kind(), Kind::Sequence | Kind::Array))
        {
            tracing::warn!(
                kind = %nested.kind(),
                "no correlation key for unordered elements of this kind"
            );
            self.recorder.record(NO_IDENTIFIER);
            return;
        }

        let fields = wanted.iter().copied().find_map(Value::as_record).map(identifier_fields);
        let keys = wanted.iter().copied().find_map(Value::as_map).map(identifier_keys);
        if fields.as_ref().is_some_and(Vec::is_empty) || keys.as_ref().is_some_and(Vec::is_empty) {
            self.recorder.record(NO_IDENTIFIER);
            return;
        }
        let field_label = fields.as_ref().map(|f| f.join("-"));
        let key_label = keys.as_ref().map(|k| {
            k.iter()
                .map(|key| Segment::Key(key.to_string()).to_string())
                .collect::<Vec<_>>()
                .join("-")
        });
        if let Some(label) = field_label.as_ref().or(key_label.as_ref()) {
            tracing::trace!(key = %label, "correlating unordered elements");
        }

        let mut used = vec![false; actual.len()];
        for (i, item) in expected.iter().enumerate() {
            let target = item.resolve();
            match (target.data(), &fields, &keys) {
                _ if asserts_nothing(target) => continue,
                (Data::Record(_), Some(fields), _) => {
                    let label = field_label.as_deref().unwrap_or_default();
                    self.correlate(actual, i, item, label, |v| identifier(v, fields));
                }
                (Data::Map(_), _, Some(keys)) => {
                    let label = key_label.as_deref().unwrap_or_default();
                    self.correlate(actual, i, item, label, |v| map_identifier(v, keys));
                }
                _ => self.contain_scalar(actual, &mut used, target),
            }
            if self.recorder.is_full() {
                break;
            }
        }
    }

    /// Compare `item` against the first actual element of the same kind
    /// whose key matches.
    fn correlate(
        &mut self,
        actual: &[Value],
        index: usize,
        item: &Value,
        label: &str,
        key: impl Fn(&Value) -> String,
    ) {
        let kind = item.resolve().kind();
        let id = key(item);
        let found = actual
            .iter()
            .position(|a| a.resolve().kind() == kind && key(a) == id);
        self.within(Segment::Index(index), |c| match found {
            Some(j) => c.respect(&actual[j], item),
            None => c.within(Segment::Identifier(label.to_string()), |c| {
                c.recorder.mismatch(NOT_FOUND, &id)
            }),
        });
    }

    /// Consume the first unused actual element equal to `wanted`.
    fn contain_scalar(&mut self, actual: &[Value], used: &mut [bool], wanted: &Value) {
        let hit = (0..actual.len())
            .find(|&j| !used[j] && self.scalars_equal(actual[j].resolve(), wanted));
        match hit {
            Some(j) => used[j] = true,
            None => self.within(Segment::Item, |c| c.recorder.mismatch(NOT_FOUND, wanted)),
        }
    }
}

/// Pattern elements with nothing to match: nil, nil containers and `()`.
fn asserts_nothing(element: &Value) -> bool {
    element.is_nil()
        || *element.ty() == Type::Unit
        || matches!(element.data(), Data::Map(None) | Data::Sequence(None))
}

/// Names of the visible, non-empty, text-valued fields of `record`.
fn identifier_fields(record: &Record) -> Vec<&str> {
    record
        .visible_fields()
        .filter(|f| !f.value().is_zero() && f.value().resolve().kind() == Kind::Text)
        .map(|f| f.name())
        .collect()
}

/// Keys of the non-empty, text-valued entries of `entries`, in key order.
fn identifier_keys(entries: &MapEntries) -> Vec<&Value> {
    entries
        .iter()
        .filter(|(_, v)| !v.is_zero() && v.resolve().kind() == Kind::Text)
        .map(|(k, _)| k)
        .collect()
}

/// The correlation key of a record element: its identifier fields rendered
/// and joined with `-`.
fn identifier(element: &Value, fields: &[&str]) -> String {
    let record = element.resolve().as_record();
    fields
        .iter()
        .map(|name| render_part(record.and_then(|r| r.field(name))))
        .collect::<Vec<_>>()
        .join("-")
}

/// The correlation key of a map element.
fn map_identifier(element: &Value, keys: &[&Value]) -> String {
    let entries = element.resolve().as_map();
    keys.iter()
        .map(|key| render_part(entries.and_then(|e| e.get(key))))
        .collect::<Vec<_>>()
        .join("-")
}

fn render_part(part: Option<&Value>) -> String {
    part.map(Value::resolve)
        .filter(|v| !v.is_nil())
        .map_or_else(|| NO_VALUE.to_string(), Value::to_string)
}
