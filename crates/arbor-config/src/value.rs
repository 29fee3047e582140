//! Scalar values, value type tags, and the input type accepted by `set_value`.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use indexmap::IndexMap;
use std::fmt;

/// Type tag for values a node can hold.
///
/// `ConfigOptions` restricts a tree to a set of these. `Number` is a
/// wildcard that admits every numeric scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueType {
    String,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Instant,
    Date,
    Number,
    List,
    Map,
}

impl ValueType {
    /// Check if this tag names a numeric scalar type.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ValueType::Int | ValueType::Long | ValueType::Float | ValueType::Double
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::Instant => "instant",
            ValueType::Date => "date",
            ValueType::Number => "number",
            ValueType::List => "list",
            ValueType::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scalar held by a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    String(String),
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),

    /// A point in time, always in UTC.
    Instant(DateTime<Utc>),

    /// A point in time that remembers the offset it was written with.
    Date(DateTime<FixedOffset>),
}

impl ScalarValue {
    /// The type tag of this scalar.
    pub fn value_type(&self) -> ValueType {
        match self {
            ScalarValue::String(_) => ValueType::String,
            ScalarValue::Boolean(_) => ValueType::Boolean,
            ScalarValue::Int(_) => ValueType::Int,
            ScalarValue::Long(_) => ValueType::Long,
            ScalarValue::Float(_) => ValueType::Float,
            ScalarValue::Double(_) => ValueType::Double,
            ScalarValue::Instant(_) => ValueType::Instant,
            ScalarValue::Date(_) => ValueType::Date,
        }
    }

    pub fn is_number(&self) -> bool {
        self.value_type().is_numeric()
    }

    /// Borrow the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::String(s) => f.write_str(s),
            ScalarValue::Boolean(b) => write!(f, "{b}"),
            ScalarValue::Int(i) => write!(f, "{i}"),
            ScalarValue::Long(l) => write!(f, "{l}"),
            // Debug keeps the trailing ".0" on integral floats
            ScalarValue::Float(v) => write!(f, "{v:?}"),
            ScalarValue::Double(v) => write!(f, "{v:?}"),
            ScalarValue::Instant(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            ScalarValue::Date(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

/// A value that can be assigned to a node.
///
/// Lists and maps are decomposed into child nodes on assignment. `Null` is
/// the removal sentinel: assigning it detaches the node from its parent.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Scalar(ScalarValue),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Build a list value from anything convertible.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map value from key/value pairs, keeping their order.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

macro_rules! scalar_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ScalarValue {
                fn from(value: $ty) -> Self {
                    ScalarValue::$variant(value)
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Scalar(ScalarValue::$variant(value))
                }
            }
        )*
    };
}

scalar_conversions! {
    String => String,
    bool => Boolean,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    DateTime<Utc> => Instant,
    DateTime<FixedOffset> => Date,
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(ScalarValue::String(value.to_string()))
    }
}

impl From<ScalarValue> for Value {
    fn from(value: ScalarValue) -> Self {
        Value::Scalar(value)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::list(items)
    }
}

impl<V: Into<Value>> From<IndexMap<String, V>> for Value {
    fn from(entries: IndexMap<String, V>) -> Self {
        Value::map(entries)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scalar_value_types() {
        assert_eq!(ScalarValue::from(3).value_type(), ValueType::Int);
        assert_eq!(ScalarValue::from(3_i64).value_type(), ValueType::Long);
        assert_eq!(ScalarValue::from(1.5_f32).value_type(), ValueType::Float);
        assert_eq!(ScalarValue::from("x").value_type(), ValueType::String);
        assert!(ScalarValue::from(2.0).is_number());
        assert!(!ScalarValue::from(true).is_number());
    }

    #[test]
    fn test_display_keeps_float_fraction() {
        assert_eq!(ScalarValue::Double(2.0).to_string(), "2.0");
        assert_eq!(ScalarValue::Double(2.5).to_string(), "2.5");
        assert_eq!(ScalarValue::Int(42).to_string(), "42");
        assert_eq!(ScalarValue::Boolean(false).to_string(), "false");
    }

    #[test]
    fn test_display_instant() {
        let instant = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            ScalarValue::Instant(instant).to_string(),
            "2020-01-02T03:04:05Z"
        );
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(1)), Value::Scalar(ScalarValue::Int(1)));
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::List(vec![Value::from(1), Value::from(2)])
        );

        let map = Value::map([("a", 1)]);
        match map {
            Value::Map(entries) => assert_eq!(entries.get("a"), Some(&Value::from(1))),
            other => panic!("expected map, got {other:?}"),
        }
    }
}
