use std::fmt;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// The runtime shape of a [`Value`](crate::Value).
///
/// Kinds mirror the variants of [`Data`](crate::Data) one-to-one. The order of
/// declaration is also the order used when sorting map keys of mixed kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Sequence,
    Array,
    Map,
    Record,
    Pointer,
}

impl Kind {
    /// Returns `true` for kinds compared by direct value equality.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Uint | Self::Float | Self::Text
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Text => "text",
            Self::Sequence => "sequence",
            Self::Array => "array",
            Self::Map => "map",
            Self::Record => "record",
            Self::Pointer => "pointer",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Scalar widths
// ---------------------------------------------------------------------------

/// Storage width of a signed integer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    Size,
}

/// Storage width of an unsigned integer type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UintWidth {
    W8,
    W16,
    W32,
    W64,
    Size,
}

/// Storage width of a floating-point type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatWidth {
    W32,
    W64,
}

// ---------------------------------------------------------------------------
// TypeName
// ---------------------------------------------------------------------------

/// Name of a user-defined type: a namespace plus a short name.
///
/// Two names are the same type only when both parts match, so `api::v1::Error`
/// and `api::v2::Error` stay distinct even though their short names collide.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName {
    namespace: String,
    name: String,
}

impl TypeName {
    /// Create a name inside a namespace (e.g. `"billing::v2"`, `"Invoice"`).
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create a name with no namespace.
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(String::new(), name)
    }

    /// The namespace part, empty for local names.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The short name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `namespace::name`, or just the name when there is no namespace.
    pub fn qualified(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.namespace, self.name)
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

/// Concrete type identity of a value.
///
/// Composite types are shallow: a sequence is a `Sequence` whatever its
/// elements are, because the comparator checks element types again when it
/// descends into them. Fixed arrays keep their length since it is part of
/// the type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Nil,
    Unit,
    Bool,
    Int(IntWidth),
    Uint(UintWidth),
    Float(FloatWidth),
    Char,
    Text,
    Sequence,
    Array(usize),
    Map,
    Optional,
    Named(Arc<TypeName>),
}

impl Type {
    /// Shorthand for `Type::Named`.
    pub fn named(name: TypeName) -> Self {
        Self::Named(Arc::new(name))
    }

    /// The user-defined name, if this is a named type.
    pub fn type_name(&self) -> Option<&TypeName> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    /// Short rendering: `String`, `Vec`, `Invoice`.
    pub fn short_name(&self) -> String {
        match self {
            Self::Named(name) => name.name().to_string(),
            other => other.builtin_name(),
        }
    }

    /// Rendering that includes the namespace of named types.
    pub fn qualified_name(&self) -> String {
        match self {
            Self::Named(name) => name.qualified(),
            other => other.builtin_name(),
        }
    }

    fn builtin_name(&self) -> String {
        let s = match self {
            Self::Nil => "nil",
            Self::Unit => "()",
            Self::Bool => "bool",
            Self::Int(IntWidth::W8) => "i8",
            Self::Int(IntWidth::W16) => "i16",
            Self::Int(IntWidth::W32) => "i32",
            Self::Int(IntWidth::W64) => "i64",
            Self::Int(IntWidth::Size) => "isize",
            Self::Uint(UintWidth::W8) => "u8",
            Self::Uint(UintWidth::W16) => "u16",
            Self::Uint(UintWidth::W32) => "u32",
            Self::Uint(UintWidth::W64) => "u64",
            Self::Uint(UintWidth::Size) => "usize",
            Self::Float(FloatWidth::W32) => "f32",
            Self::Float(FloatWidth::W64) => "f64",
            Self::Char => "char",
            Self::Text => "String",
            Self::Sequence => "Vec",
            Self::Map => "Map",
            Self::Optional => "Option",
            Self::Array(len) => return format!("[_; {len}]"),
            Self::Named(name) => return name.name().to_string(),
        };
        s.to_string()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}
