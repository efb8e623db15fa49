//! Host values
//!
//! The scripting layer that drives keypath hands over loosely typed values:
//! variable names, subscript tables, replacement strings. [`Value`] models
//! them so builders can reject the wrong type with a precise
//! [`Error::InputType`](crate::Error::InputType) instead of coercing.
//!
//! Numbers are deliberately not strings here. A number converted to a
//! string on the fly would have no owner outside the buffer that views it.

use bytes::Bytes;

/// A dynamically typed value supplied by the host runtime
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Byte string (subscripts and names are not required to be UTF-8)
    String(Bytes),
    /// Ordered sequence, 1-based at the host boundary
    Table(Vec<Value>),
}

impl Value {
    /// Host-facing name of this value's type
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "nil",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Table(_) => "table",
        }
    }

    /// The string bytes, if this is a string
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The table elements, if this is a table
    pub fn as_table(&self) -> Option<&[Value]> {
        match self {
            Value::Table(items) => Some(items),
            _ => None,
        }
    }

    /// The integer, if this is an integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Check if this is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this is a table
    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }
}

impl From<&'static str> for Value {
    fn from(s: &'static str) -> Self {
        Value::String(Bytes::from_static(s.as_bytes()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Bytes::from(s))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::String(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Table(items.into_iter().map(Into::into).collect())
    }
}
