use ordered_float::OrderedFloat;
use polars::prelude::AnyValue;
use serde::{Serialize, Serializer};
use std::fmt;

/// One distinct value of a group key.
///
/// Values are totally ordered so grouped results can live in a `BTreeMap`: numbers
/// compare numerically (floats through [`OrderedFloat`]) and station names lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupValue {
    Integer(i64),
    Float(OrderedFloat<f64>),
    Text(String),
}

impl GroupValue {
    /// Converts a single cell of a key column. Returns `None` for nulls and for
    /// types that cannot act as a key.
    pub(crate) fn from_any_value(value: &AnyValue) -> Option<GroupValue> {
        match value {
            AnyValue::Int64(v) => Some(GroupValue::Integer(*v)),
            AnyValue::Int32(v) => Some(GroupValue::Integer(i64::from(*v))),
            AnyValue::UInt32(v) => Some(GroupValue::Integer(i64::from(*v))),
            AnyValue::Float64(v) => Some(GroupValue::Float(OrderedFloat(*v))),
            AnyValue::Float32(v) => Some(GroupValue::Float(OrderedFloat(f64::from(*v)))),
            AnyValue::String(s) => Some(GroupValue::Text(s.to_string())),
            AnyValue::StringOwned(s) => Some(GroupValue::Text(s.to_string())),
            _ => None,
        }
    }
}

impl From<i64> for GroupValue {
    fn from(value: i64) -> Self {
        GroupValue::Integer(value)
    }
}

impl From<f64> for GroupValue {
    fn from(value: f64) -> Self {
        GroupValue::Float(OrderedFloat(value))
    }
}

impl From<&str> for GroupValue {
    fn from(value: &str) -> Self {
        GroupValue::Text(value.to_string())
    }
}

impl From<String> for GroupValue {
    fn from(value: String) -> Self {
        GroupValue::Text(value)
    }
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Integer(v) => write!(f, "{v}"),
            GroupValue::Float(v) => write!(f, "{}", v.into_inner()),
            GroupValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// Plain scalar, so JSON consumers see `1`, `0.5` or `"Aotizhongxin"`.
impl Serialize for GroupValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupValue::Integer(v) => serializer.serialize_i64(*v),
            GroupValue::Float(v) => serializer.serialize_f64(v.into_inner()),
            GroupValue::Text(s) => serializer.serialize_str(s),
        }
    }
}
