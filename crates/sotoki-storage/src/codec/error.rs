//! Decode error types.
//!
//! Any of these means the bytes in the store do not match the format the
//! codec writes. They are treated as data corruption: fatal, never retried.

use thiserror::Error;

/// Errors raised while unpacking values or decoding composite keys.
///
/// Implements `Clone` and `PartialEq` for testing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// Fewer bytes than the format requires.
    #[error("Truncated input: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Kind tag outside the closed set of value kinds.
    #[error("Unknown value kind tag: {0}")]
    UnknownKind(u8),

    /// Text payload is not valid UTF-8.
    #[error("Invalid UTF-8 in text value: {0}")]
    InvalidUtf8(String),

    /// Structured payload is not a valid JSON document.
    #[error("Invalid structured value: {0}")]
    InvalidStructured(String),

    /// Bytes left over after a complete value.
    #[error("Trailing bytes after value: {0} unread")]
    TrailingBytes(usize),

    /// Composite key does not follow the component encoding.
    #[error("Malformed key at byte {offset}: {details}")]
    MalformedKey { offset: usize, details: String },
}
