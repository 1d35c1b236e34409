//! The recursive structural comparison.

use std::sync::Arc;

use respect_types::{Data, MapEntries, Record, Type, Value};

use crate::config::RespectConfig;
use crate::diff::{DiffList, Recorder, NIL_MAP, NIL_POINTER, NO_KEY};
use crate::path::Segment;

/// Comparison context for one top-level call: the configuration plus the
/// shared recorder every branch writes into.
pub(crate) struct Comparator<'a> {
    pub(crate) config: &'a RespectConfig,
    pub(crate) recorder: Recorder,
}

impl<'a> Comparator<'a> {
    pub(crate) fn new(config: &'a RespectConfig) -> Self {
        Self {
            config,
            recorder: Recorder::new(config.max_diff),
        }
    }

    pub(crate) fn finish(self) -> DiffList {
        self.recorder.finish()
    }

    /// Run `f` with `segment` pushed onto the path.
    pub(crate) fn within<R>(&mut self, segment: Segment, f: impl FnOnce(&mut Self) -> R) -> R {
        self.recorder.push(segment);
        let out = f(self);
        self.recorder.pop();
        out
    }

    /// Check that `actual` respects `expected`, recording every divergence.
    pub(crate) fn respect(&mut self, actual: &Value, expected: &Value) {
        // An absent pattern asserts nothing.
        if expected.is_nil() {
            return;
        }

        if actual.is_nil() {
            self.recorder.mismatch(NIL_POINTER, expected.ty());
            return;
        }

        if actual.ty() != expected.ty() || actual.kind() != expected.kind() {
            self.type_mismatch(actual.ty(), expected.ty());
            return;
        }

        if !self.config.options.zero_value_matters() && expected.is_zero() {
            return;
        }

        match (actual.data(), expected.data()) {
            (Data::Record(a), Data::Record(e)) => self.respect_record(actual, a, expected, e),
            (Data::Map(a), Data::Map(e)) => self.respect_map(a.as_ref(), expected, e.as_ref()),
            (Data::Array(a), Data::Array(e)) => self.respect_array(a, e),
            (Data::Sequence(a), Data::Sequence(e)) => {
                self.respect_sequence(a.as_ref(), expected, e.as_ref())
            }
            (Data::Pointer(_), Data::Pointer(_)) => self.respect(actual.elem(), expected.elem()),
            _ => {
                if !self.scalars_equal(actual, expected) {
                    self.recorder.mismatch(actual, expected);
                }
            }
        }
    }

    /// Scalar equality for values of the same type. Floats are compared
    /// after rounding both sides to the configured precision.
    pub(crate) fn scalars_equal(&self, actual: &Value, expected: &Value) -> bool {
        if actual.ty() != expected.ty() {
            return false;
        }
        match (actual.data(), expected.data()) {
            (Data::Bool(a), Data::Bool(e)) => a == e,
            (Data::Int(a), Data::Int(e)) => a == e,
            (Data::Uint(a), Data::Uint(e)) => a == e,
            (Data::Text(a), Data::Text(e)) => a == e,
            (Data::Float(a), Data::Float(e)) => {
                let precision = self.config.float_precision;
                format!("{a:.precision$}") == format!("{e:.precision$}")
            }
            _ => false,
        }
    }

    fn type_mismatch(&mut self, actual: &Type, expected: &Type) {
        // Short names are ambiguous when two namespaces export the same one.
        let colliding = match (actual.type_name(), expected.type_name()) {
            (Some(a), Some(e)) => a.name() == e.name(),
            _ => false,
        };
        self.within(Segment::Type, |c| {
            if colliding {
                c.recorder
                    .mismatch(actual.qualified_name(), expected.qualified_name());
            } else {
                c.recorder.mismatch(actual, expected);
            }
        });
    }

    fn respect_record(
        &mut self,
        actual: &Value,
        actual_record: &Record,
        expected: &Value,
        expected_record: &Record,
    ) {
        // Only an equality declared for this very type may stand in for the
        // field walk; an inherited one belongs to an embedded member.
        if let Some(equality) = actual_record.equality() {
            if equality.accepts(expected.ty()) {
                if !equality.call(actual_record, expected_record) {
                    self.recorder.mismatch(actual, expected);
                }
                return;
            }
        }

        for field in expected_record.visible_fields() {
            let actual_field = actual_record.field(field.name()).unwrap_or(Value::nil());
            self.within(Segment::Field(field.name().to_string()), |c| {
                c.respect(actual_field, field.value())
            });
            if self.recorder.is_full() {
                break;
            }
        }
    }

    fn respect_map(
        &mut self,
        actual: Option<&Arc<MapEntries>>,
        expected: &Value,
        expected_entries: Option<&Arc<MapEntries>>,
    ) {
        let Some(expected_entries) = expected_entries.filter(|e| !e.is_empty()) else {
            return;
        };
        let Some(actual) = actual else {
            self.recorder.mismatch(NIL_MAP, expected);
            return;
        };
        if Arc::ptr_eq(actual, expected_entries) {
            return;
        }

        for (key, value) in expected_entries.iter() {
            self.within(Segment::Key(key.to_string()), |c| match actual.get(key) {
                Some(found) => c.respect(found, value),
                None => c.recorder.mismatch(NO_KEY, value),
            });
            if self.recorder.is_full() {
                return;
            }
        }
    }

    fn respect_array(&mut self, actual: &[Value], expected: &[Value]) {
        for (i, item) in expected.iter().enumerate() {
            let found = actual.get(i).unwrap_or(Value::nil());
            self.within(Segment::ArrayIndex(i), |c| c.respect(found, item));
            if self.recorder.is_full() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use respect_types::{Equality, MapEntries, Record, ToValue, TypeName};

    use super::*;
    use crate::options::Options;

    fn run(actual: &Value, expected: &Value, options: Options) -> Vec<String> {
        let config = RespectConfig::with_options(options);
        let mut comparator = Comparator::new(&config);
        comparator.respect(actual, expected);
        comparator.finish().into_vec()
    }

    fn person(name: &str, age: i32) -> Value {
        Record::builder(TypeName::new("people", "Person"))
            .field("Name", name.to_value())
            .field("Age", age.to_value())
            .hidden("note", Value::text("private"))
            .build()
    }

    fn stamp(secs: i64, offset: i64) -> Value {
        // Equal instants may be written with different offsets.
        Record::builder(TypeName::new("time", "Stamp"))
            .field("secs", Value::int(secs))
            .field("offset", Value::int(offset))
            .equal_by(|a, b| {
                let instant = |r: &Record| {
                    let secs = r.field("secs").and_then(Value::as_i64).unwrap_or(0);
                    let offset = r.field("offset").and_then(Value::as_i64).unwrap_or(0);
                    secs - offset
                };
                instant(a) == instant(b)
            })
            .build()
    }

    #[test]
    fn zero_fields_are_ignored_by_default() {
        assert!(run(&person("A", 3), &person("", 3), Options::empty()).is_empty());
    }

    #[test]
    fn zero_fields_asserted_with_policy() {
        let diffs = run(&person("A", 3), &person("", 3), Options::ZERO_VALUE_MATTERS);
        assert_eq!(diffs, ["Name: A != "]);
    }

    #[test]
    fn scalar_mismatch_is_path_qualified() {
        let diffs = run(&person("A", 3), &person("B", 4), Options::empty());
        assert_eq!(diffs, ["Name: A != B", "Age: 3 != 4"]);
    }

    #[test]
    fn hidden_fields_are_invisible() {
        let actual = person("A", 3);
        let expected = Record::builder(TypeName::new("people", "Person"))
            .field("Name", Value::text("A"))
            .field("Age", 3i32.to_value())
            .hidden("note", Value::text("something else"))
            .build();
        assert!(run(&actual, &expected, Options::empty()).is_empty());
    }

    #[test]
    fn same_short_name_in_other_namespace_never_respects() {
        let v1 = Record::builder(TypeName::new("api::v1", "Error"))
            .field("code", Value::int(1))
            .build();
        let v2 = Record::builder(TypeName::new("api::v2", "Error"))
            .field("code", Value::int(1))
            .build();
        let diffs = run(&v1, &v2, Options::empty());
        assert_eq!(diffs, ["<type>: api::v1::Error != api::v2::Error"]);
    }

    #[test]
    fn distinct_names_use_short_form() {
        let diffs = run(&Value::int(1), &Value::text("1"), Options::empty());
        assert_eq!(diffs, ["<type>: i64 != String"]);
        let diffs = run(&1i32.to_value(), &1i64.to_value(), Options::empty());
        assert_eq!(diffs, ["<type>: i32 != i64"]);
    }

    #[test]
    fn missing_actual_field_is_nil_pointer() {
        let actual = Record::builder(TypeName::local("T")).build();
        let expected = Record::builder(TypeName::local("T"))
            .field("x", Value::int(1))
            .build();
        assert_eq!(run(&actual, &expected, Options::empty()), ["x: <nil pointer> != i64"]);
    }

    #[test]
    fn pointers_are_dereferenced() {
        let actual = Value::some(person("A", 3));
        assert!(run(&actual, &Value::some(person("A", 0)), Options::empty()).is_empty());
        let diffs = run(&actual, &Value::some(person("B", 0)), Options::empty());
        assert_eq!(diffs, ["Name: A != B"]);
    }

    #[test]
    fn pointer_versus_value_is_a_type_mismatch() {
        let diffs = run(&Value::some(person("A", 3)), &person("A", 3), Options::empty());
        assert_eq!(diffs, ["<type>: Option != Person"]);
    }

    #[test]
    fn nil_actual_pointer_against_present_pattern() {
        let diffs = run(&Value::none(), &Value::some(Value::int(1)), Options::empty());
        assert_eq!(diffs, ["<nil pointer> != i64"]);
    }

    #[test]
    fn nil_pattern_pointer_with_zero_policy_asserts_nothing() {
        let diffs = run(&Value::some(Value::int(1)), &Value::none(), Options::ZERO_VALUE_MATTERS);
        assert!(diffs.is_empty());
    }

    #[test]
    fn floats_rounded_to_precision() {
        assert!(run(&Value::float(2.40000000001), &Value::float(2.4), Options::empty()).is_empty());
        let diffs = run(&Value::float(2.400000001), &Value::float(2.4), Options::empty());
        assert_eq!(diffs, ["2.400000001 != 2.4"]);
    }

    #[test]
    fn coarser_precision_from_config() {
        let config = RespectConfig {
            float_precision: 2,
            ..Default::default()
        };
        let mut comparator = Comparator::new(&config);
        comparator.respect(&Value::float(1.001), &Value::float(1.0));
        assert!(comparator.finish().is_empty());
    }

    #[test]
    fn map_is_containment() {
        let actual = [("1+1", "2"), ("2*2", "4")]
            .into_iter()
            .map(|(k, v)| (Value::text(k), Value::text(v)))
            .collect::<MapEntries>();
        let expected = [("2*2", "4")]
            .into_iter()
            .map(|(k, v)| (Value::text(k), Value::text(v)))
            .collect::<MapEntries>();
        assert!(run(&Value::map(actual.clone()), &Value::map(expected), Options::empty()).is_empty());

        let wrong = [("2*2", "5"), ("3*3", "9")]
            .into_iter()
            .map(|(k, v)| (Value::text(k), Value::text(v)))
            .collect::<MapEntries>();
        let diffs = run(&Value::map(actual), &Value::map(wrong), Options::empty());
        assert_eq!(
            diffs,
            ["map[2*2]: 4 != 5", "map[3*3]: <does not have key> != 9"]
        );
    }

    #[test]
    fn nil_actual_map() {
        let expected = [(Value::text("k"), Value::int(1))].into_iter().collect::<MapEntries>();
        let diffs = run(&Value::nil_map(), &Value::map(expected), Options::empty());
        assert_eq!(diffs, ["<nil map> != map[k:1]"]);
    }

    #[test]
    fn shared_map_storage_short_circuits() {
        let mut entries = MapEntries::new();
        entries.insert(Value::text("k"), Value::float(f64::NAN));
        let shared = Value::map(entries);
        assert!(run(&shared, &shared.clone(), Options::empty()).is_empty());
    }

    #[test]
    fn arrays_compare_by_index() {
        let actual = [1, 2, 3].to_value();
        let expected = [1, 0, 4].to_value();
        assert_eq!(run(&actual, &expected, Options::empty()), ["array[2]: 3 != 4"]);
        let diffs = run(&[1, 2].to_value(), &[1, 2, 3].to_value(), Options::empty());
        assert_eq!(diffs, ["<type>: [_; 2] != [_; 3]"]);
    }

    #[test]
    fn custom_equality_replaces_field_walk() {
        assert!(run(&stamp(3600, 3600), &stamp(7200, 7200), Options::empty()).is_empty());
        let diffs = run(&stamp(10, 0), &stamp(20, 0), Options::empty());
        assert_eq!(diffs, ["{10 0} != {20 0}"]);
    }

    #[test]
    fn inherited_equality_is_not_applied_to_outer_type() {
        let event = |secs, offset, label: &str| {
            Record::builder(TypeName::local("Event"))
                .embed(stamp(secs, offset))
                .field("label", Value::text(label))
                .build()
        };
        // The outer type is walked field by field; the embedded stamp then
        // uses its own equality.
        assert!(run(&event(3600, 3600, "x"), &event(7200, 7200, "x"), Options::empty()).is_empty());
        let diffs = run(&event(1, 0, "x"), &event(1, 0, "y"), Options::empty());
        assert_eq!(diffs, ["label: x != y"]);
        let diffs = run(&event(1, 0, "x"), &event(2, 0, "x"), Options::empty());
        assert_eq!(diffs, ["Stamp: {1 0} != {2 0}"]);
    }

    #[test]
    fn equality_declared_for_another_type_is_skipped() {
        let foreign = Equality::new(Type::named(TypeName::local("Other")), |_, _| false);
        let actual = Record::builder(TypeName::local("T"))
            .field("x", Value::int(1))
            .equality(foreign)
            .build();
        let expected = Record::builder(TypeName::local("T"))
            .field("x", Value::int(1))
            .build();
        assert!(run(&actual, &expected, Options::empty()).is_empty());
    }

    #[test]
    fn diff_cap_applies_across_fields() {
        let build = |offset: i64| {
            (0..12)
                .fold(Record::builder(TypeName::local("Wide")), |b, i| {
                    b.field(format!("f{i}"), Value::int(i + offset))
                })
                .build()
        };
        let diffs = run(&build(1), &build(100), Options::empty());
        assert_eq!(diffs.len(), 10);
        assert_eq!(diffs[0], "f0: 1 != 100");
    }
}
