#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! # `TypeFill` values
//!
//! The dynamic value model shared by every `TypeFill` package. A [`Value`]
//! carries one runtime datum through the filling pipeline, and a
//! [`ValueKind`] names its runtime type for checks and error messages.
//!
//! Rust types convert in through `From` and back out through `TryFrom`:
//!
//! ```rust
//! use typefill_values::{Value, ValueKind};
//!
//! let value = Value::from(vec![1, 2, 3]);
//! assert_eq!(value.kind(), ValueKind::List);
//!
//! let ints: Vec<i64> = value.try_into().unwrap();
//! assert_eq!(ints, vec![1, 2, 3]);
//! ```

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use thiserror::Error;

#[cfg(feature = "serde_json")]
pub mod serde_json;

/// A runtime value flowing through the filling pipeline.
///
/// Numeric literals are normalized on the way in: every integer width maps
/// to `Int` and every float width maps to `Float`, so kind checks never
/// depend on the width a caller happened to start from.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    DateTime(NaiveDateTime),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

/// The runtime kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    DateTime,
    List,
    Map,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::DateTime => "datetime",
            Self::List => "list",
            Self::Map => "map",
        })
    }
}

impl ValueKind {
    /// Whether a value of this kind also counts as a value of `other`.
    ///
    /// Every kind is a subkind of itself. The only proper subkind is
    /// `Bool`, which counts as `Int` the way `true` and `false` behave as
    /// `1` and `0` in arithmetic contexts.
    #[must_use]
    pub fn is_subkind_of(self, other: Self) -> bool {
        self == other || (self == Self::Bool && other == Self::Int)
    }
}

impl Value {
    /// The runtime kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Str(_) => ValueKind::Str,
            Self::DateTime(_) => ValueKind::DateTime,
            Self::List(_) => ValueKind::List,
            Self::Map(_) => ValueKind::Map,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer payload, treating `Bool` as `0` or `1`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Bool(value) => Some(i64::from(*value)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date_time(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::DateTime(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<BTreeMap<String, T>> for Value {
    fn from(entries: BTreeMap<String, T>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key, value.into()))
                .collect(),
        )
    }
}

/// Error converting a [`Value`] back into a concrete Rust type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TryFromValueError {
    #[error("could not convert value of kind `{kind}` into {target}")]
    CouldNotConvert {
        kind: ValueKind,
        target: &'static str,
    },
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),
}

impl TryFromValueError {
    const fn mismatch(value: &Value, target: &'static str) -> Self {
        Self::CouldNotConvert {
            kind: value.kind(),
            target,
        }
    }
}

impl TryFrom<Value> for bool {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(value) => Ok(value),
            _ => Err(TryFromValueError::mismatch(&value, "bool")),
        }
    }
}

impl TryFrom<Value> for i64 {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(value) => Ok(value),
            Value::Bool(value) => Ok(Self::from(value)),
            _ => Err(TryFromValueError::mismatch(&value, "i64")),
        }
    }
}

impl TryFrom<Value> for i32 {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(value) => Ok(Self::try_from(value)?),
            Value::Bool(value) => Ok(Self::from(value)),
            _ => Err(TryFromValueError::mismatch(&value, "i32")),
        }
    }
}

impl TryFrom<Value> for u32 {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(value) => Ok(Self::try_from(value)?),
            Value::Bool(value) => Ok(Self::from(value)),
            _ => Err(TryFromValueError::mismatch(&value, "u32")),
        }
    }
}

impl TryFrom<Value> for u64 {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Int(value) => Ok(Self::try_from(value)?),
            Value::Bool(value) => Ok(Self::from(value)),
            _ => Err(TryFromValueError::mismatch(&value, "u64")),
        }
    }
}

impl TryFrom<Value> for f64 {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Float(value) => Ok(value),
            _ => Err(TryFromValueError::mismatch(&value, "f64")),
        }
    }
}

impl TryFrom<Value> for String {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(value) => Ok(value),
            _ => Err(TryFromValueError::mismatch(&value, "String")),
        }
    }
}

impl TryFrom<Value> for NaiveDateTime {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::DateTime(value) => Ok(value),
            _ => Err(TryFromValueError::mismatch(&value, "NaiveDateTime")),
        }
    }
}

impl<T: TryFrom<Value, Error = TryFromValueError>> TryFrom<Value> for Vec<T> {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::List(values) => values.into_iter().map(T::try_from).collect(),
            _ => Err(TryFromValueError::mismatch(&value, "Vec")),
        }
    }
}

impl<T: TryFrom<Value, Error = TryFromValueError>> TryFrom<Value> for Option<T> {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(None),
            value => T::try_from(value).map(Some),
        }
    }
}

impl<T: TryFrom<Value, Error = TryFromValueError>> TryFrom<Value> for BTreeMap<String, T> {
    type Error = TryFromValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Map(entries) => entries
                .into_iter()
                .map(|(key, value)| Ok((key, T::try_from(value)?)))
                .collect(),
            _ => Err(TryFromValueError::mismatch(&value, "BTreeMap")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test_log::test]
    fn kind_classifies_every_variant() {
        assert_eq!(Value::Null.kind(), ValueKind::Null);
        assert_eq!(Value::Bool(true).kind(), ValueKind::Bool);
        assert_eq!(Value::Int(5).kind(), ValueKind::Int);
        assert_eq!(Value::Float(5.0).kind(), ValueKind::Float);
        assert_eq!(Value::Str("x".into()).kind(), ValueKind::Str);
        assert_eq!(Value::List(vec![]).kind(), ValueKind::List);
        assert_eq!(Value::Map(BTreeMap::new()).kind(), ValueKind::Map);
    }

    #[test_log::test]
    fn every_kind_is_a_subkind_of_itself() {
        for kind in [
            ValueKind::Null,
            ValueKind::Bool,
            ValueKind::Int,
            ValueKind::Float,
            ValueKind::Str,
            ValueKind::DateTime,
            ValueKind::List,
            ValueKind::Map,
        ] {
            assert!(kind.is_subkind_of(kind));
        }
    }

    #[test_log::test]
    fn bool_is_a_subkind_of_int_but_not_the_reverse() {
        assert!(ValueKind::Bool.is_subkind_of(ValueKind::Int));
        assert!(!ValueKind::Int.is_subkind_of(ValueKind::Bool));
        assert!(!ValueKind::Bool.is_subkind_of(ValueKind::Float));
    }

    #[test_log::test]
    fn integer_widths_normalize_to_int() {
        assert_eq!(Value::from(5_i8), Value::Int(5));
        assert_eq!(Value::from(5_i16), Value::Int(5));
        assert_eq!(Value::from(5_i32), Value::Int(5));
        assert_eq!(Value::from(5_u8), Value::Int(5));
        assert_eq!(Value::from(5_u16), Value::Int(5));
        assert_eq!(Value::from(5_u32), Value::Int(5));
    }

    #[test_log::test]
    fn option_maps_to_null_or_inner() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some(5_i64)), Value::Int(5));
    }

    #[test_log::test]
    fn vec_maps_element_wise() {
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::List(vec![Value::Str("a".into()), Value::Str("b".into())]),
        );
    }

    #[test_log::test]
    fn as_i64_treats_bool_as_integer() {
        assert_eq!(Value::Bool(true).as_i64(), Some(1));
        assert_eq!(Value::Bool(false).as_i64(), Some(0));
        assert_eq!(Value::Float(1.0).as_i64(), None);
    }

    #[test_log::test]
    fn try_from_extracts_exact_kinds() {
        assert_eq!(i64::try_from(Value::Int(5)), Ok(5));
        assert_eq!(f64::try_from(Value::Float(5.5)), Ok(5.5));
        assert_eq!(String::try_from(Value::Str("x".into())), Ok("x".into()));
        assert_eq!(bool::try_from(Value::Bool(true)), Ok(true));
    }

    #[test_log::test]
    fn try_from_accepts_bool_where_int_is_wanted() {
        assert_eq!(i64::try_from(Value::Bool(true)), Ok(1));
        assert_eq!(u32::try_from(Value::Bool(false)), Ok(0));
    }

    #[test_log::test]
    fn try_from_rejects_kind_mismatches() {
        assert_eq!(
            i64::try_from(Value::Str("5".into())),
            Err(TryFromValueError::CouldNotConvert {
                kind: ValueKind::Str,
                target: "i64",
            }),
        );
        assert_eq!(
            f64::try_from(Value::Int(5)),
            Err(TryFromValueError::CouldNotConvert {
                kind: ValueKind::Int,
                target: "f64",
            }),
        );
    }

    #[test_log::test]
    fn try_from_narrows_with_range_checks() {
        assert_eq!(i32::try_from(Value::Int(5)), Ok(5));
        assert!(matches!(
            i32::try_from(Value::Int(i64::MAX)),
            Err(TryFromValueError::TryFromInt(_)),
        ));
        assert!(matches!(
            u64::try_from(Value::Int(-5)),
            Err(TryFromValueError::TryFromInt(_)),
        ));
    }

    #[test_log::test]
    fn try_from_extracts_nested_collections() {
        let value = Value::from(vec![vec![1_i64, 2], vec![3]]);
        let lists: Vec<Vec<i64>> = value.try_into().unwrap();
        assert_eq!(lists, vec![vec![1, 2], vec![3]]);
    }

    #[test_log::test]
    fn try_from_option_splits_on_null() {
        assert_eq!(Option::<i64>::try_from(Value::Null), Ok(None));
        assert_eq!(Option::<i64>::try_from(Value::Int(5)), Ok(Some(5)));
        assert!(Option::<i64>::try_from(Value::Str("5".into())).is_err());
    }

    #[test_log::test]
    fn try_from_map_extracts_string_keyed_entries() {
        let mut entries = BTreeMap::new();
        entries.insert("a".to_string(), Value::Int(1));
        entries.insert("b".to_string(), Value::Int(2));

        let extracted: BTreeMap<String, i64> = Value::Map(entries).try_into().unwrap();

        assert_eq!(extracted.get("a"), Some(&1));
        assert_eq!(extracted.get("b"), Some(&2));
    }

    #[test_log::test]
    fn error_displays_kind_and_target() {
        assert_eq!(
            TryFromValueError::CouldNotConvert {
                kind: ValueKind::Str,
                target: "i64",
            }
            .to_string(),
            "could not convert value of kind `str` into i64",
        );
    }

    #[test_log::test]
    fn kind_displays_lowercase_names() {
        assert_eq!(ValueKind::DateTime.to_string(), "datetime");
        assert_eq!(ValueKind::List.to_string(), "list");
    }
}
