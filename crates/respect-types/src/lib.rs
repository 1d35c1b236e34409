//! Value model for the respect comparison engine.
//!
//! The engine compares arbitrary nested data without knowing its schema, so
//! every input is first lowered into a [`Value`]: a typed, read-only view
//! exposing the value's kind, its concrete type identity and, for
//! composites, its members.
//!
//! # Key Types
//!
//! - [`Value`] / [`Data`] -- A typed value and its tagged payload
//! - [`Type`] / [`TypeName`] -- Concrete type identity, namespace aware
//! - [`Record`] / [`Field`] -- Struct-like values, with hidden fields
//! - [`Equality`] -- Domain equality a record type may declare
//! - [`MapEntries`] -- Deterministically ordered map storage
//!
//! Values are produced from any `serde::Serialize` type with [`to_value`],
//! from std types with [`ToValue`], or by hand with [`Record::builder`].

pub mod convert;
pub mod error;
pub mod ser;
pub mod types;
pub mod value;

pub use convert::ToValue;
pub use error::{ValueError, ValueResult};
pub use ser::{to_value, ValueSerializer};
pub use types::{FloatWidth, IntWidth, Kind, Type, TypeName, UintWidth};
pub use value::{Data, Equality, Field, MapEntries, Record, RecordBuilder, Value};
