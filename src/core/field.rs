//! Field value types and record access

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A polymorphic field value read out of a record
///
/// `Null` doubles as the "undefined" value: a missing key and an explicit
/// `null` resolve to the same thing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    #[default]
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Like [`as_f64`](Self::as_f64) but also parses numeric strings
    pub fn to_number(&self) -> Option<f64> {
        match self {
            FieldValue::String(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        }
    }

    /// Check if the value is a number
    pub fn is_number(&self) -> bool {
        matches!(self, FieldValue::Integer(_) | FieldValue::Float(_))
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text form used for substring matching and string coercion
    ///
    /// `Null` has no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Null => None,
        }
    }

    /// Equality that treats `1` and `1.0` as the same number
    pub fn loosely_equals(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (a, b) if a.is_number() && b.is_number() => a.as_f64() == b.as_f64(),
            (a, b) => a == b,
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Float).unwrap_or(FieldValue::Null),
            },
            Value::String(s) => FieldValue::String(s.clone()),
            // Composite values only take part in matching through their JSON text
            Value::Array(_) | Value::Object(_) => FieldValue::String(value.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// An opaque row the engine can read fields from
///
/// Keys are accessor ids; for JSON records they are dotted paths such as
/// `"paymentMethod.name"`. Unknown keys resolve to [`FieldValue::Null`].
pub trait Record {
    fn resolve(&self, key: &str) -> FieldValue;
}

impl Record for Value {
    fn resolve(&self, key: &str) -> FieldValue {
        lookup_path(self, key)
            .map(FieldValue::from)
            .unwrap_or(FieldValue::Null)
    }
}

/// Walk a dotted path through nested JSON objects
///
/// Numeric segments index into arrays. Returns `None` as soon as a segment
/// is missing.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
