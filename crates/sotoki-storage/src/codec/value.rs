//! Value packing.
//!
//! # Packed forms
//! | Kind | Tag | Bytes |
//! |------|-----|-------|
//! | Integer | 1 | 8 bytes big-endian, sign bit flipped |
//! | Text | 2 | u32 big-endian length + UTF-8 |
//! | Structured | 3 | u32 big-endian length + JSON text |
//!
//! Flipping the sign bit makes unsigned byte order equal numeric order, so
//! index scans over integer values come back numerically sorted. Text is
//! length-prefixed, which means text values sort by length before content in
//! the index. Equality lookups do not care; range scans over text do.

use sotoki_core::{Value, ValueKind};

use super::error::DecodeError;

const SIGN_FLIP_MASK: u64 = 1u64 << 63;
const INTEGER_WIDTH: usize = 8;
const LENGTH_WIDTH: usize = 4;

/// A value in its stored form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedValue {
    pub kind: ValueKind,
    pub bytes: Vec<u8>,
}

fn encode_i64_ordered(value: i64) -> [u8; 8] {
    (value as u64 ^ SIGN_FLIP_MASK).to_be_bytes()
}

fn decode_i64_ordered(bytes: [u8; 8]) -> i64 {
    (u64::from_be_bytes(bytes) ^ SIGN_FLIP_MASK) as i64
}

fn encode_length_prefixed(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(LENGTH_WIDTH + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

fn decode_length_prefixed(bytes: &[u8]) -> Result<&[u8], DecodeError> {
    if bytes.len() < LENGTH_WIDTH {
        return Err(DecodeError::Truncated {
            expected: LENGTH_WIDTH,
            actual: bytes.len(),
        });
    }
    let mut len_bytes = [0u8; LENGTH_WIDTH];
    len_bytes.copy_from_slice(&bytes[..LENGTH_WIDTH]);
    let len = u32::from_be_bytes(len_bytes) as usize;

    let end = LENGTH_WIDTH + len;
    if bytes.len() < end {
        return Err(DecodeError::Truncated {
            expected: end,
            actual: bytes.len(),
        });
    }
    if bytes.len() > end {
        return Err(DecodeError::TrailingBytes(bytes.len() - end));
    }
    Ok(&bytes[LENGTH_WIDTH..end])
}

/// Packs a value into its kind tag and ordered byte form.
pub fn pack(value: &Value) -> PackedValue {
    let bytes = match value {
        Value::Integer(n) => encode_i64_ordered(*n).to_vec(),
        Value::Text(s) => encode_length_prefixed(s.as_bytes()),
        Value::Structured(json) => encode_length_prefixed(json.to_string().as_bytes()),
    };
    PackedValue {
        kind: value.kind(),
        bytes,
    }
}

/// Inverse of [`pack`].
///
/// # Errors
/// - `DecodeError::UnknownKind` for a tag outside the closed set
/// - `DecodeError::Truncated` / `TrailingBytes` when the length does not match
/// - `DecodeError::InvalidUtf8` / `InvalidStructured` for bad payloads
pub fn unpack(kind_tag: u8, bytes: &[u8]) -> Result<Value, DecodeError> {
    let kind = ValueKind::from_u8(kind_tag).ok_or(DecodeError::UnknownKind(kind_tag))?;
    match kind {
        ValueKind::Integer => {
            if bytes.len() < INTEGER_WIDTH {
                return Err(DecodeError::Truncated {
                    expected: INTEGER_WIDTH,
                    actual: bytes.len(),
                });
            }
            if bytes.len() > INTEGER_WIDTH {
                return Err(DecodeError::TrailingBytes(bytes.len() - INTEGER_WIDTH));
            }
            let mut raw = [0u8; INTEGER_WIDTH];
            raw.copy_from_slice(bytes);
            Ok(Value::Integer(decode_i64_ordered(raw)))
        }
        ValueKind::Text => {
            let payload = decode_length_prefixed(bytes)?;
            let text = std::str::from_utf8(payload)
                .map_err(|e| DecodeError::InvalidUtf8(e.to_string()))?;
            Ok(Value::Text(text.to_string()))
        }
        ValueKind::Structured => {
            let payload = decode_length_prefixed(bytes)?;
            let json = serde_json::from_slice(payload)
                .map_err(|e| DecodeError::InvalidStructured(e.to_string()))?;
            Ok(Value::Structured(json))
        }
    }
}

/// Encodes a primary-relation row value: `[kind tag][packed bytes]`.
pub fn encode_row_value(packed: &PackedValue) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + packed.bytes.len());
    out.push(packed.kind.as_u8());
    out.extend_from_slice(&packed.bytes);
    out
}

/// Decodes a primary-relation row value written by [`encode_row_value`].
pub fn decode_row_value(bytes: &[u8]) -> Result<Value, DecodeError> {
    let (&tag, rest) = bytes.split_first().ok_or(DecodeError::Truncated {
        expected: 1,
        actual: 0,
    })?;
    unpack(tag, rest)
}
