//! Attribute values carried on spans
//!
//! Producers attach a free-form bag of primitive key-value pairs to every span
//! (`data` on the wire). Values are restricted to the JSON primitives:
//!
//! 1. `Null` - JSON null / absent measurement
//! 2. `Bool` - Boolean flag (e.g. `is_error`)
//! 3. `Int` - 64-bit signed integer (counts, lengths)
//! 4. `Float` - 64-bit IEEE-754 float (timings)
//! 5. `String` - UTF-8 text (model names, tool names)
//!
//! Nested arrays or objects are rejected at decode time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A primitive attribute value
///
/// Encoded untagged, so `{"model": "gpt-4", "chunk_count": 3}` decodes to
/// `String` and `Int` respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpanValue {
    /// Boolean true or false
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit IEEE-754 floating point
    Float(f64),
    /// UTF-8 encoded string
    String(String),
    /// JSON null
    Null,
}

impl SpanValue {
    /// Returns the type name as a string (for diagnostics)
    pub fn type_name(&self) -> &'static str {
        match self {
            SpanValue::Null => "Null",
            SpanValue::Bool(_) => "Bool",
            SpanValue::Int(_) => "Int",
            SpanValue::Float(_) => "Float",
            SpanValue::String(_) => "String",
        }
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, SpanValue::Null)
    }

    /// Try to get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SpanValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SpanValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as f64 (integers widen)
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SpanValue::Float(f) => Some(*f),
            SpanValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SpanValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value counts as "present" for summary capture
    ///
    /// Empty strings, zero, NaN, `false` and null are not truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            SpanValue::Null => false,
            SpanValue::Bool(b) => *b,
            SpanValue::Int(i) => *i != 0,
            SpanValue::Float(f) => *f != 0.0 && !f.is_nan(),
            SpanValue::String(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for SpanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanValue::Null => f.write_str("null"),
            SpanValue::Bool(b) => write!(f, "{}", b),
            SpanValue::Int(i) => write!(f, "{}", i),
            SpanValue::Float(x) => write!(f, "{}", x),
            SpanValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for SpanValue {
    fn from(s: &str) -> Self {
        SpanValue::String(s.to_string())
    }
}

impl From<String> for SpanValue {
    fn from(s: String) -> Self {
        SpanValue::String(s)
    }
}

impl From<i64> for SpanValue {
    fn from(i: i64) -> Self {
        SpanValue::Int(i)
    }
}

impl From<f64> for SpanValue {
    fn from(f: f64) -> Self {
        SpanValue::Float(f)
    }
}

impl From<bool> for SpanValue {
    fn from(b: bool) -> Self {
        SpanValue::Bool(b)
    }
}

/// Key-value attribute bag attached to a span
///
/// Unknown keys are preserved verbatim; well-known keys (`model`,
/// `tool_name`, ...) have typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpanData(BTreeMap<String, SpanValue>);

impl SpanData {
    /// Key holding the model name on `turn` and `llm` spans
    pub const MODEL: &'static str = "model";

    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&SpanValue> {
        self.0.get(key)
    }

    /// Get a string value by key
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SpanValue::as_str)
    }

    /// Set a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SpanValue>) -> Option<SpanValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Model name, if `data.model` is present and truthy
    pub fn model(&self) -> Option<String> {
        self.get(Self::MODEL)
            .filter(|v| v.is_truthy())
            .map(|v| v.to_string())
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the bag has no attributes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate attributes in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpanValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<SpanValue>> FromIterator<(K, V)> for SpanData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        SpanData(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
