//! The uniform value representation inspected by the comparator.
//!
//! A [`Value`] pairs a concrete [`Type`] with its [`Data`]. Values are
//! read-only views: sequences and maps keep their storage behind an `Arc`, so
//! two values cloned from the same source share storage and the comparator
//! can recognise them as identical without walking them.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::types::{FloatWidth, IntWidth, Kind, Type, TypeName, UintWidth};

static NIL: Value = Value::NIL;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A typed runtime value.
#[derive(Clone, Debug)]
pub struct Value {
    ty: Type,
    data: Data,
}

/// Payload of a [`Value`].
///
/// `Sequence` and `Map` distinguish *nil* (`None`) from *empty*; `Pointer`
/// covers both references and optionals.
#[derive(Clone, Debug)]
pub enum Data {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Sequence(Option<Arc<Vec<Value>>>),
    Array(Vec<Value>),
    Map(Option<Arc<MapEntries>>),
    Record(Record),
    Pointer(Option<Box<Value>>),
}

impl Value {
    /// The absent value.
    pub const NIL: Value = Value {
        ty: Type::Nil,
        data: Data::Nil,
    };

    /// A `'static` reference to [`Value::NIL`].
    pub fn nil() -> &'static Value {
        &NIL
    }

    /// Build a value from an explicit type and payload.
    pub fn new(ty: Type, data: Data) -> Self {
        Self { ty, data }
    }

    pub fn bool(v: bool) -> Self {
        Self::new(Type::Bool, Data::Bool(v))
    }

    /// An `i64`.
    pub fn int(v: i64) -> Self {
        Self::int_with(v, IntWidth::W64)
    }

    pub fn int_with(v: i64, width: IntWidth) -> Self {
        Self::new(Type::Int(width), Data::Int(v))
    }

    /// A `u64`.
    pub fn uint(v: u64) -> Self {
        Self::uint_with(v, UintWidth::W64)
    }

    pub fn uint_with(v: u64, width: UintWidth) -> Self {
        Self::new(Type::Uint(width), Data::Uint(v))
    }

    /// An `f64`.
    pub fn float(v: f64) -> Self {
        Self::new(Type::Float(FloatWidth::W64), Data::Float(v))
    }

    pub fn float32(v: f32) -> Self {
        Self::new(Type::Float(FloatWidth::W32), Data::Float(v as f64))
    }

    pub fn text(v: impl Into<String>) -> Self {
        Self::new(Type::Text, Data::Text(v.into()))
    }

    pub fn char(v: char) -> Self {
        Self::new(Type::Char, Data::Text(v.to_string()))
    }

    /// A growable sequence with its own storage.
    pub fn sequence(items: Vec<Value>) -> Self {
        Self::shared_sequence(Arc::new(items))
    }

    /// A sequence over storage that other values may share.
    pub fn shared_sequence(items: Arc<Vec<Value>>) -> Self {
        Self::new(Type::Sequence, Data::Sequence(Some(items)))
    }

    /// A sequence that was never allocated.
    pub fn nil_sequence() -> Self {
        Self::new(Type::Sequence, Data::Sequence(None))
    }

    /// A fixed-size array. The length becomes part of the type.
    pub fn array(items: Vec<Value>) -> Self {
        Self::new(Type::Array(items.len()), Data::Array(items))
    }

    pub fn map(entries: MapEntries) -> Self {
        Self::shared_map(Arc::new(entries))
    }

    pub fn shared_map(entries: Arc<MapEntries>) -> Self {
        Self::new(Type::Map, Data::Map(Some(entries)))
    }

    pub fn nil_map() -> Self {
        Self::new(Type::Map, Data::Map(None))
    }

    /// A present optional / pointer.
    pub fn some(v: Value) -> Self {
        Self::new(Type::Optional, Data::Pointer(Some(Box::new(v))))
    }

    /// An absent optional / nil pointer. Unlike [`Value::NIL`] this is a
    /// typed value.
    pub fn none() -> Self {
        Self::new(Type::Optional, Data::Pointer(None))
    }

    /// The unit value `()`.
    pub fn unit() -> Self {
        Self::new(Type::Unit, Data::Record(Record::default()))
    }

    /// Reinterpret the payload under another type, e.g. a text value as a
    /// named `Color`.
    pub fn retyped(self, ty: Type) -> Self {
        Self { ty, data: self.data }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn kind(&self) -> Kind {
        self.data.kind()
    }

    /// Returns `true` for the absent value.
    pub fn is_nil(&self) -> bool {
        matches!(self.data, Data::Nil)
    }

    /// Returns `true` if this is the zero value of its type.
    ///
    /// Nil sequences, maps and pointers are zero; empty but allocated ones
    /// are not. Records are zero when every field is, hidden fields
    /// included.
    pub fn is_zero(&self) -> bool {
        match &self.data {
            Data::Nil => true,
            Data::Bool(v) => !*v,
            Data::Int(v) => *v == 0,
            Data::Uint(v) => *v == 0,
            Data::Float(v) => v.to_bits() == 0,
            Data::Text(v) => v.is_empty(),
            Data::Sequence(items) => items.is_none(),
            Data::Map(entries) => entries.is_none(),
            Data::Pointer(target) => target.is_none(),
            Data::Array(items) => items.iter().all(Value::is_zero),
            Data::Record(record) => record.fields.iter().all(|f| f.value.is_zero()),
        }
    }

    /// Dereference one level of pointer. A nil pointer yields [`Value::NIL`];
    /// any other value yields itself.
    pub fn elem(&self) -> &Value {
        match &self.data {
            Data::Pointer(Some(target)) => target,
            Data::Pointer(None) => &NIL,
            _ => self,
        }
    }

    /// Dereference pointers until a non-pointer (or nil) is reached.
    pub fn resolve(&self) -> &Value {
        let mut current = self;
        while let Data::Pointer(_) = current.data {
            current = current.elem();
        }
        current
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Data::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.data {
            Data::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.data {
            Data::Uint(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.data {
            Data::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::Text(v) => Some(v),
            _ => None,
        }
    }

    /// The entries of a non-nil map.
    pub fn as_map(&self) -> Option<&MapEntries> {
        match &self.data {
            Data::Map(Some(entries)) => Some(&**entries),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match &self.data {
            Data::Record(r) => Some(r),
            _ => None,
        }
    }
}

impl Data {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Nil => Kind::Nil,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Uint(_) => Kind::Uint,
            Self::Float(_) => Kind::Float,
            Self::Text(_) => Kind::Text,
            Self::Sequence(_) => Kind::Sequence,
            Self::Array(_) => Kind::Array,
            Self::Map(_) => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Pointer(_) => Kind::Pointer,
        }
    }
}

/// Renders values the way they appear inside diagnostics: scalars raw,
/// sequences as `[a b]`, maps as `map[k:v]`, records as `{v1 v2}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Data::Nil => f.write_str("<nil>"),
            Data::Bool(v) => write!(f, "{v}"),
            Data::Int(v) => write!(f, "{v}"),
            Data::Uint(v) => write!(f, "{v}"),
            Data::Float(v) => write!(f, "{v}"),
            Data::Text(v) => f.write_str(v),
            Data::Sequence(None) => f.write_str("[]"),
            Data::Sequence(Some(items)) => write_joined(f, "[", items.iter(), "]"),
            Data::Array(items) => write_joined(f, "[", items.iter(), "]"),
            Data::Map(None) => f.write_str("map[]"),
            Data::Map(Some(entries)) => {
                f.write_str("map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("]")
            }
            Data::Record(record) => {
                write_joined(f, "{", record.fields.iter().map(|field| &field.value), "}")
            }
            Data::Pointer(None) => f.write_str("<nil>"),
            Data::Pointer(Some(target)) => write!(f, "&{target}"),
        }
    }
}

fn write_joined<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A named field of a [`Record`].
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    value: Value,
    exported: bool,
}

impl Field {
    /// A visible field.
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
            exported: true,
        }
    }

    /// A field that exists on the record but is invisible to comparison.
    pub fn hidden(name: impl Into<String>, value: Value) -> Self {
        Self {
            exported: false,
            ..Self::new(name, value)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_exported(&self) -> bool {
        self.exported
    }
}

/// Struct-like payload: fields in declaration order plus an optional
/// domain equality.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: Vec<Field>,
    equality: Option<Equality>,
}

impl Record {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            equality: None,
        }
    }

    /// Start building a record value of the given type.
    pub fn builder(name: TypeName) -> RecordBuilder {
        RecordBuilder {
            ty: Type::named(name),
            fields: Vec::new(),
            equality: None,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields that take part in comparison, in declaration order.
    pub fn visible_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.exported)
    }

    /// Look up a field by name, hidden or not.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.value)
    }

    pub fn equality(&self) -> Option<&Equality> {
        self.equality.as_ref()
    }

    pub fn set_equality(&mut self, equality: Equality) {
        self.equality = Some(equality);
    }
}

/// Builder for record values. Obtained from [`Record::builder`].
pub struct RecordBuilder {
    ty: Type,
    fields: Vec<Field>,
    equality: Option<Equality>,
}

impl RecordBuilder {
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    pub fn hidden(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.push(Field::hidden(name, value));
        self
    }

    /// Embed another record as a field named after its type.
    ///
    /// Like method promotion, the embedded record's equality is inherited
    /// when this record has none of its own. The inherited operation keeps
    /// its declared parameter type, so the comparator will not apply it to
    /// the outer type.
    pub fn embed(mut self, value: Value) -> Self {
        if self.equality.is_none() {
            self.equality = value.as_record().and_then(|r| r.equality.clone());
        }
        let name = value.ty().short_name();
        self.fields.push(Field::new(name, value));
        self
    }

    pub fn equality(mut self, equality: Equality) -> Self {
        self.equality = Some(equality);
        self
    }

    /// Attach a domain equality declared on this record's own type.
    pub fn equal_by<F>(self, eq: F) -> Self
    where
        F: Fn(&Record, &Record) -> bool + Send + Sync + 'static,
    {
        let equality = Equality::new(self.ty.clone(), eq);
        self.equality(equality)
    }

    pub fn build(self) -> Value {
        Value::new(
            self.ty,
            Data::Record(Record {
                fields: self.fields,
                equality: self.equality,
            }),
        )
    }
}

// ---------------------------------------------------------------------------
// Equality
// ---------------------------------------------------------------------------

type EqFn = dyn Fn(&Record, &Record) -> bool + Send + Sync;

/// A domain equality operation declared for one parameter type.
///
/// The comparator prefers it over field-by-field comparison, but only when
/// the declared parameter type is the type being compared.
#[derive(Clone)]
pub struct Equality {
    param: Type,
    eq: Arc<EqFn>,
}

impl Equality {
    pub fn new<F>(param: Type, eq: F) -> Self
    where
        F: Fn(&Record, &Record) -> bool + Send + Sync + 'static,
    {
        Self {
            param,
            eq: Arc::new(eq),
        }
    }

    /// The declared parameter type.
    pub fn param(&self) -> &Type {
        &self.param
    }

    /// Whether this operation may be applied to values of `ty`.
    pub fn accepts(&self, ty: &Type) -> bool {
        self.param == *ty
    }

    pub fn call(&self, this: &Record, other: &Record) -> bool {
        (self.eq)(this, other)
    }
}

impl fmt::Debug for Equality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Equality")
            .field("param", &self.param)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// MapEntries
// ---------------------------------------------------------------------------

/// Map storage, kept sorted by key so iteration order is deterministic.
#[derive(Clone, Debug, Default)]
pub struct MapEntries {
    entries: Vec<(Value, Value)>,
}

impl MapEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value for an equal key.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.position(&key) {
            Ok(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            Err(i) => {
                self.entries.insert(i, (key, value));
                None
            }
        }
    }

    /// Find the value stored under a key of the same type and payload.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).ok().map(|i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    fn position(&self, key: &Value) -> Result<usize, usize> {
        self.entries.binary_search_by(|(k, _)| key_order(k, key))
    }
}

impl FromIterator<(Value, Value)> for MapEntries {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut entries = Self::new();
        for (key, value) in iter {
            entries.insert(key, value);
        }
        entries
    }
}

/// Total order over keys: by payload for scalars of the same kind, then by
/// kind and rendering, and finally by type so keys of different types never
/// collapse into one entry.
fn key_order(a: &Value, b: &Value) -> Ordering {
    let by_payload = match (&a.data, &b.data) {
        (Data::Bool(x), Data::Bool(y)) => x.cmp(y),
        (Data::Int(x), Data::Int(y)) => x.cmp(y),
        (Data::Uint(x), Data::Uint(y)) => x.cmp(y),
        (Data::Float(x), Data::Float(y)) => x.total_cmp(y),
        (Data::Text(x), Data::Text(y)) => x.cmp(y),
        _ => a
            .kind()
            .cmp(&b.kind())
            .then_with(|| a.to_string().cmp(&b.to_string())),
    };
    by_payload.then_with(|| a.ty.qualified_name().cmp(&b.ty.qualified_name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(name: &str, age: i64) -> Value {
        Record::builder(TypeName::new("people", "Person"))
            .field("name", Value::text(name))
            .field("age", Value::int(age))
            .hidden("secret", Value::text("s"))
            .build()
    }

    #[test]
    fn zero_values() {
        assert!(Value::NIL.is_zero());
        assert!(Value::int(0).is_zero());
        assert!(Value::text("").is_zero());
        assert!(Value::none().is_zero());
        assert!(Value::nil_sequence().is_zero());
        assert!(!Value::sequence(Vec::new()).is_zero());
        assert!(!Value::map(MapEntries::new()).is_zero());
        assert!(Value::array(vec![Value::int(0), Value::bool(false)]).is_zero());
        assert!(!Value::float(-0.0).is_zero());
    }

    #[test]
    fn hidden_fields_count_towards_zero() {
        let record = Record::builder(TypeName::local("T"))
            .hidden("s", Value::text("x"))
            .build();
        assert!(!record.is_zero());
        assert_eq!(record.as_record().unwrap().visible_fields().count(), 0);
    }

    #[test]
    fn resolve_follows_pointers() {
        let v = Value::some(Value::some(Value::int(7)));
        assert_eq!(v.resolve().as_i64(), Some(7));
        assert!(Value::some(Value::none()).resolve().is_nil());
        assert_eq!(v.elem().kind(), Kind::Pointer);
    }

    #[test]
    fn record_field_lookup() {
        let p = person("Ann", 30);
        let record = p.as_record().unwrap();
        assert_eq!(record.field("age").and_then(Value::as_i64), Some(30));
        assert!(record.field("secret").is_some());
        assert!(record.field("missing").is_none());
        let names: Vec<_> = record.visible_fields().map(Field::name).collect();
        assert_eq!(names, ["name", "age"]);
    }

    #[test]
    fn display_forms() {
        assert_eq!(person("Ann", 30).to_string(), "{Ann 30 s}");
        assert_eq!(
            Value::sequence(vec![Value::text("a"), Value::int(1)]).to_string(),
            "[a 1]"
        );
        assert_eq!(Value::some(Value::int(3)).to_string(), "&3");
        assert_eq!(Value::none().to_string(), "<nil>");
        assert_eq!(Value::float(2.4).to_string(), "2.4");
    }

    #[test]
    fn map_entries_sorted_and_typed() {
        let entries: MapEntries = [
            (Value::text("b"), Value::int(2)),
            (Value::text("a"), Value::int(1)),
        ]
        .into_iter()
        .collect();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(entries.get(&Value::text("b")).and_then(Value::as_i64), Some(2));
        assert!(entries.get(&Value::char('a')).is_none());
        assert_eq!(Value::map(entries).to_string(), "map[a:1 b:2]");
    }

    #[test]
    fn map_insert_replaces() {
        let mut entries = MapEntries::new();
        assert!(entries.insert(Value::int(1), Value::text("x")).is_none());
        let old = entries.insert(Value::int(1), Value::text("y"));
        assert_eq!(old.and_then(|v| v.as_str().map(str::to_owned)).as_deref(), Some("x"));
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn embed_inherits_equality_with_declared_param() {
        let stamp = Record::builder(TypeName::new("time", "Stamp"))
            .field("secs", Value::int(1))
            .equal_by(|_, _| true)
            .build();
        let outer = Record::builder(TypeName::local("Event")).embed(stamp).build();
        let record = outer.as_record().unwrap();
        let equality = record.equality().unwrap();
        assert!(!equality.accepts(outer.ty()));
        assert_eq!(equality.param().short_name(), "Stamp");
        assert!(record.field("Stamp").is_some());
    }
}
