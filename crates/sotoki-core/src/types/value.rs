//! Typed attribute values.
//!
//! The set of value kinds is closed. Every value carries its kind from the
//! moment it is built; nothing is inferred from the data at write time.

use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Kind tag stored next to every packed value.
///
/// The numeric tag is part of the on-disk format and of the secondary index
/// ordering (index rows sort by kind before value).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum ValueKind {
    Integer = 1,
    Text = 2,
    Structured = 3,
}

impl ValueKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ValueKind::Integer),
            2 => Some(ValueKind::Text),
            3 => Some(ValueKind::Structured),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
            ValueKind::Structured => "structured",
        };
        f.write_str(name)
    }
}

/// An attribute value.
///
/// Serializes untagged so rendered contexts see plain numbers, strings and
/// JSON documents.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Text(String),
    Structured(JsonValue),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Text(_) => ValueKind::Text,
            Value::Structured(_) => ValueKind::Structured,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Value::Structured(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Structured(json) => write!(f, "{json}"),
        }
    }
}
