//! Lowering of `serde::Serialize` data into [`Value`]s.
//!
//! Serialization is the introspection facility: it reports struct and field
//! names in declaration order, integer widths, optionals and sequences. The
//! mapping is:
//!
//! - structs, tuple structs and unit structs become records named after the
//!   type (tuple fields are named `0`, `1`, ...)
//! - newtype structs reinterpret their inner value under the newtype's name
//! - unit enum variants become text typed as the enum
//! - enum variants with data become records typed `Enum::Variant`
//! - `Option` becomes a pointer, tuples become fixed arrays
//! - bytes become a sequence of `u8`
//!
//! Serde only exposes short type names, so named types produced here have no
//! namespace. Use [`Record::builder`] for namespaced types.

use serde::ser::{self, Serialize};

use crate::error::{ValueError, ValueResult};
use crate::types::{IntWidth, Type, TypeName, UintWidth};
use crate::value::{Data, Field, MapEntries, Record, Value};

/// Convert any serializable value into a [`Value`].
pub fn to_value<T>(value: &T) -> ValueResult<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

fn named(name: &'static str) -> Type {
    Type::named(TypeName::local(name))
}

fn variant(name: &'static str, variant: &'static str) -> Type {
    Type::named(TypeName::new(name, variant))
}

/// Serializer whose output is a [`Value`].
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValueError;

    type SerializeSeq = SerializeSeq;
    type SerializeTuple = SerializeSeq;
    type SerializeTupleStruct = SerializeRecord;
    type SerializeTupleVariant = SerializeRecord;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeRecord;

    fn serialize_bool(self, v: bool) -> ValueResult<Value> {
        Ok(Value::bool(v))
    }

    fn serialize_i8(self, v: i8) -> ValueResult<Value> {
        Ok(Value::int_with(v.into(), IntWidth::W8))
    }

    fn serialize_i16(self, v: i16) -> ValueResult<Value> {
        Ok(Value::int_with(v.into(), IntWidth::W16))
    }

    fn serialize_i32(self, v: i32) -> ValueResult<Value> {
        Ok(Value::int_with(v.into(), IntWidth::W32))
    }

    fn serialize_i64(self, v: i64) -> ValueResult<Value> {
        Ok(Value::int(v))
    }

    fn serialize_i128(self, v: i128) -> ValueResult<Value> {
        i64::try_from(v)
            .map(Value::int)
            .map_err(|_| ValueError::Unsupported(format!("i128 {v} does not fit in 64 bits")))
    }

    fn serialize_u8(self, v: u8) -> ValueResult<Value> {
        Ok(Value::uint_with(v.into(), UintWidth::W8))
    }

    fn serialize_u16(self, v: u16) -> ValueResult<Value> {
        Ok(Value::uint_with(v.into(), UintWidth::W16))
    }

    fn serialize_u32(self, v: u32) -> ValueResult<Value> {
        Ok(Value::uint_with(v.into(), UintWidth::W32))
    }

    fn serialize_u64(self, v: u64) -> ValueResult<Value> {
        Ok(Value::uint(v))
    }

    fn serialize_u128(self, v: u128) -> ValueResult<Value> {
        u64::try_from(v)
            .map(Value::uint)
            .map_err(|_| ValueError::Unsupported(format!("u128 {v} does not fit in 64 bits")))
    }

    fn serialize_f32(self, v: f32) -> ValueResult<Value> {
        Ok(Value::float32(v))
    }

    fn serialize_f64(self, v: f64) -> ValueResult<Value> {
        Ok(Value::float(v))
    }

    fn serialize_char(self, v: char) -> ValueResult<Value> {
        Ok(Value::char(v))
    }

    fn serialize_str(self, v: &str) -> ValueResult<Value> {
        Ok(Value::text(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> ValueResult<Value> {
        let items = v
            .iter()
            .map(|b| Value::uint_with((*b).into(), UintWidth::W8))
            .collect();
        Ok(Value::sequence(items))
    }

    fn serialize_none(self) -> ValueResult<Value> {
        Ok(Value::none())
    }

    fn serialize_some<T>(self, value: &T) -> ValueResult<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(Value::some(to_value(value)?))
    }

    fn serialize_unit(self) -> ValueResult<Value> {
        Ok(Value::unit())
    }

    fn serialize_unit_struct(self, name: &'static str) -> ValueResult<Value> {
        Ok(Value::new(named(name), Data::Record(Record::default())))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> ValueResult<Value> {
        Ok(Value::text(variant).retyped(named(name)))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> ValueResult<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(to_value(value)?.retyped(named(name)))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant_name: &'static str,
        value: &T,
    ) -> ValueResult<Value>
    where
        T: ?Sized + Serialize,
    {
        let fields = vec![Field::new("0", to_value(value)?)];
        Ok(Value::new(
            variant(name, variant_name),
            Data::Record(Record::new(fields)),
        ))
    }

    fn serialize_seq(self, len: Option<usize>) -> ValueResult<SerializeSeq> {
        Ok(SerializeSeq {
            items: Vec::with_capacity(len.unwrap_or(0)),
            fixed: false,
        })
    }

    fn serialize_tuple(self, len: usize) -> ValueResult<SerializeSeq> {
        Ok(SerializeSeq {
            items: Vec::with_capacity(len),
            fixed: true,
        })
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> ValueResult<SerializeRecord> {
        Ok(SerializeRecord::new(named(name), len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant_name: &'static str,
        len: usize,
    ) -> ValueResult<SerializeRecord> {
        Ok(SerializeRecord::new(variant(name, variant_name), len))
    }

    fn serialize_map(self, _len: Option<usize>) -> ValueResult<SerializeMap> {
        Ok(SerializeMap {
            entries: MapEntries::new(),
            next_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> ValueResult<SerializeRecord> {
        Ok(SerializeRecord::new(named(name), len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant_name: &'static str,
        len: usize,
    ) -> ValueResult<SerializeRecord> {
        Ok(SerializeRecord::new(variant(name, variant_name), len))
    }
}

// ---------------------------------------------------------------------------
// Compound serializers
// ---------------------------------------------------------------------------

/// Collects sequence and tuple elements.
pub struct SerializeSeq {
    items: Vec<Value>,
    fixed: bool,
}

impl SerializeSeq {
    fn push<T>(&mut self, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        if self.fixed {
            Value::array(self.items)
        } else {
            Value::sequence(self.items)
        }
    }
}

impl ser::SerializeSeq for SerializeSeq {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T>(&mut self, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeSeq {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T>(&mut self, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

/// Collects map entries; keys may be any value.
pub struct SerializeMap {
    entries: MapEntries,
    next_key: Option<Value>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_key<T>(&mut self, key: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or(ValueError::MissingMapKey)?;
        self.entries.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> ValueResult<Value> {
        Ok(Value::map(self.entries))
    }
}

/// Collects the fields of structs, tuple structs and data-carrying variants.
pub struct SerializeRecord {
    ty: Type,
    fields: Vec<Field>,
}

impl SerializeRecord {
    fn new(ty: Type, len: usize) -> Self {
        Self {
            ty,
            fields: Vec::with_capacity(len),
        }
    }

    fn push<T>(&mut self, name: String, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.fields.push(Field::new(name, to_value(value)?));
        Ok(())
    }

    fn push_positional<T>(&mut self, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        let name = self.fields.len().to_string();
        self.push(name, value)
    }

    fn finish(self) -> Value {
        Value::new(self.ty, Data::Record(Record::new(self.fields)))
    }
}

impl ser::SerializeTupleStruct for SerializeRecord {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_positional(value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeRecord {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_positional(value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(key.to_string(), value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeRecord {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> ValueResult<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(key.to_string(), value)
    }

    fn end(self) -> ValueResult<Value> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;
    use serde_json::json;

    use super::*;
    use crate::types::Kind;

    #[derive(Serialize)]
    struct Leg {
        name: Option<String>,
    }

    #[derive(Serialize)]
    struct Color(String);

    #[derive(Serialize)]
    enum Shape {
        Dot,
        Circle { radius: f64 },
        Pair(i32, i32),
    }

    #[derive(Serialize)]
    struct Person {
        name: String,
        age: i32,
        #[serde(skip)]
        _note: String,
        color: Color,
        legs: Vec<Leg>,
        memory: BTreeMap<String, String>,
        point: (u8, u8),
    }

    fn sample() -> Person {
        Person {
            name: "NeZha".into(),
            age: 3,
            _note: "ignored".into(),
            color: Color("Yellow".into()),
            legs: vec![Leg { name: Some("Left".into()) }],
            memory: [("1+1".to_string(), "2".to_string())].into_iter().collect(),
            point: (1, 2),
        }
    }

    #[test]
    fn struct_becomes_record_in_declaration_order() {
        let value = to_value(&sample()).unwrap();
        assert_eq!(value.ty().short_name(), "Person");
        let record = value.as_record().unwrap();
        let names: Vec<_> = record.fields().iter().map(Field::name).collect();
        assert_eq!(names, ["name", "age", "color", "legs", "memory", "point"]);
        assert_eq!(record.field("age").unwrap().ty(), &Type::Int(IntWidth::W32));
    }

    #[test]
    fn newtype_keeps_payload_under_new_name() {
        let value = to_value(&Color("Black".into())).unwrap();
        assert_eq!(value.kind(), Kind::Text);
        assert_eq!(value.ty().short_name(), "Color");
        assert_eq!(value.as_str(), Some("Black"));
    }

    #[test]
    fn option_and_tuple_shapes() {
        let value = to_value(&sample()).unwrap();
        let record = value.as_record().unwrap();
        let legs = record.field("legs").unwrap();
        assert_eq!(legs.kind(), Kind::Sequence);
        let point = record.field("point").unwrap();
        assert_eq!(point.ty(), &Type::Array(2));
        assert_eq!(to_value(&Some(1u8)).unwrap().kind(), Kind::Pointer);
        assert!(to_value(&None::<u8>).unwrap().is_zero());
    }

    #[test]
    fn enum_variants() {
        let dot = to_value(&Shape::Dot).unwrap();
        assert_eq!(dot.kind(), Kind::Text);
        assert_eq!(dot.ty().short_name(), "Shape");

        let circle = to_value(&Shape::Circle { radius: 1.5 }).unwrap();
        assert_eq!(circle.kind(), Kind::Record);
        assert_eq!(circle.ty().qualified_name(), "Shape::Circle");

        let pair = to_value(&Shape::Pair(1, 2)).unwrap();
        let record = pair.as_record().unwrap();
        assert_eq!(record.field("1").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn json_documents() {
        let value = to_value(&json!({"b": [1, "x"], "a": null, "c": -2})).unwrap();
        let Data::Map(Some(entries)) = value.data() else {
            panic!("expected a map, got {value:?}");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(entries.get(&Value::text("c")).unwrap().ty(), &Type::Int(IntWidth::W64));
        assert_eq!(entries.get(&Value::text("a")).unwrap().ty(), &Type::Unit);
    }

    #[test]
    fn oversized_integers_are_rejected() {
        let err = to_value(&(u64::MAX as u128 + 1)).unwrap_err();
        assert!(matches!(err, ValueError::Unsupported(_)));
    }
}
