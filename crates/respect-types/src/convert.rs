use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::types::{IntWidth, UintWidth};
use crate::value::{MapEntries, Value};

/// Infallible conversion of std data into a [`Value`].
///
/// Covers the types whose shape is known statically. Anything else that
/// implements `serde::Serialize` goes through [`to_value`](crate::to_value).
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::bool(*self)
    }
}

macro_rules! int_to_value {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::int_with(*self as i64, $width)
            }
        })*
    };
}

macro_rules! uint_to_value {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(impl ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::uint_with(*self as u64, $width)
            }
        })*
    };
}

int_to_value!(
    i8 => IntWidth::W8,
    i16 => IntWidth::W16,
    i32 => IntWidth::W32,
    i64 => IntWidth::W64,
    isize => IntWidth::Size,
);

uint_to_value!(
    u8 => UintWidth::W8,
    u16 => UintWidth::W16,
    u32 => UintWidth::W32,
    u64 => UintWidth::W64,
    usize => UintWidth::Size,
);

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::float32(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::float(*self)
    }
}

impl ToValue for char {
    fn to_value(&self) -> Value {
        Value::char(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::text(self)
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::text(self.as_str())
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        Value::some((**self).to_value())
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        Value::some((**self).to_value())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => Value::some(v.to_value()),
            None => Value::none(),
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::sequence(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::sequence(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        Value::array(self.iter().map(ToValue::to_value).collect())
    }
}

impl<K: ToValue, V: ToValue, S> ToValue for HashMap<K, V, S> {
    fn to_value(&self) -> Value {
        Value::map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect::<MapEntries>(),
        )
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::map(
            self.iter()
                .map(|(k, v)| (k.to_value(), v.to_value()))
                .collect::<MapEntries>(),
        )
    }
}
