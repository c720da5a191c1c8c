//! Composite key encoding for both relations.
//!
//! A key is a sequence of byte components. Inside a component every `0x00`
//! is written as `0x00 0xFF`; each component ends with `0x00 0x01`. The
//! terminator sorts below the escape and below every other byte, so byte
//! order of encoded keys equals component-wise lexicographic order, and any
//! byte is legal inside an id or attribute name.
//!
//! # Layouts
//! ```text
//! tuples        [entity ns][entity local][attr ns][attr field]
//! tuples_index  [attr ns][attr field][kind][packed value][entity ns][entity local]
//! ```

use sotoki_core::{AttributeName, EntityId, Value, ValueKind};

use super::error::DecodeError;
use super::value::{pack, unpack, PackedValue};

const COMPONENT_MARK: u8 = 0x00;
const ESCAPED_NUL: u8 = 0xFF;
const TERMINATOR: u8 = 0x01;

/// Appends one escaped, terminated component.
pub(crate) fn push_component(buf: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        if b == COMPONENT_MARK {
            buf.push(COMPONENT_MARK);
            buf.push(ESCAPED_NUL);
        } else {
            buf.push(b);
        }
    }
    buf.push(COMPONENT_MARK);
    buf.push(TERMINATOR);
}

/// Reads components back out of an encoded key.
pub(crate) struct ComponentReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ComponentReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn next_bytes(&mut self) -> Result<Vec<u8>, DecodeError> {
        let start = self.offset;
        let mut out = Vec::new();
        while self.offset < self.data.len() {
            let b = self.data[self.offset];
            if b != COMPONENT_MARK {
                out.push(b);
                self.offset += 1;
                continue;
            }
            match self.data.get(self.offset + 1) {
                Some(&ESCAPED_NUL) => {
                    out.push(COMPONENT_MARK);
                    self.offset += 2;
                }
                Some(&TERMINATOR) => {
                    self.offset += 2;
                    return Ok(out);
                }
                Some(other) => {
                    return Err(DecodeError::MalformedKey {
                        offset: self.offset + 1,
                        details: format!("invalid escape byte 0x{other:02x}"),
                    })
                }
                None => break,
            }
        }
        Err(DecodeError::MalformedKey {
            offset: start,
            details: "unterminated component".to_string(),
        })
    }

    pub(crate) fn next_string(&mut self) -> Result<String, DecodeError> {
        let offset = self.offset;
        let bytes = self.next_bytes()?;
        String::from_utf8(bytes).map_err(|e| DecodeError::MalformedKey {
            offset,
            details: format!("component is not UTF-8: {e}"),
        })
    }

    pub(crate) fn next_kind(&mut self) -> Result<ValueKind, DecodeError> {
        let offset = self.offset;
        match self.next_bytes()?.as_slice() {
            [tag] => ValueKind::from_u8(*tag).ok_or(DecodeError::UnknownKind(*tag)),
            other => Err(DecodeError::MalformedKey {
                offset,
                details: format!("kind component has {} bytes, expected 1", other.len()),
            }),
        }
    }

    pub(crate) fn finish(self) -> Result<(), DecodeError> {
        if self.offset == self.data.len() {
            Ok(())
        } else {
            Err(DecodeError::MalformedKey {
                offset: self.offset,
                details: format!("{} bytes after last component", self.data.len() - self.offset),
            })
        }
    }
}

fn push_entity(buf: &mut Vec<u8>, entity: &EntityId) {
    push_component(buf, entity.namespace().as_bytes());
    push_component(buf, entity.local().as_bytes());
}

fn push_attribute(buf: &mut Vec<u8>, attribute: &AttributeName) {
    push_component(buf, attribute.namespace().as_bytes());
    push_component(buf, attribute.field().as_bytes());
}

fn read_entity(reader: &mut ComponentReader<'_>) -> Result<EntityId, DecodeError> {
    let namespace = reader.next_string()?;
    let local = reader.next_string()?;
    Ok(EntityId::new(namespace, local))
}

fn read_attribute(reader: &mut ComponentReader<'_>) -> Result<AttributeName, DecodeError> {
    let namespace = reader.next_string()?;
    let field = reader.next_string()?;
    Ok(AttributeName::new(namespace, field))
}

/// Key of the primary relation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimaryKey {
    pub entity: EntityId,
    pub attribute: AttributeName,
}

impl PrimaryKey {
    pub fn new(entity: EntityId, attribute: AttributeName) -> Self {
        Self { entity, attribute }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        push_entity(&mut buf, &self.entity);
        push_attribute(&mut buf, &self.attribute);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ComponentReader::new(bytes);
        let entity = read_entity(&mut reader)?;
        let attribute = read_attribute(&mut reader)?;
        reader.finish()?;
        Ok(Self { entity, attribute })
    }

    /// Smallest possible key for `entity`: every row of the entity starts
    /// with these bytes and sorts at or after them.
    pub fn entity_prefix(entity: &EntityId) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32);
        push_entity(&mut buf, entity);
        buf
    }
}

/// Key of the secondary index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexKey {
    pub attribute: AttributeName,
    pub value: PackedValue,
    pub entity: EntityId,
}

impl IndexKey {
    pub fn new(attribute: AttributeName, value: PackedValue, entity: EntityId) -> Self {
        Self {
            attribute,
            value,
            entity,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64 + self.value.bytes.len());
        push_attribute(&mut buf, &self.attribute);
        push_component(&mut buf, &[self.value.kind.as_u8()]);
        push_component(&mut buf, &self.value.bytes);
        push_entity(&mut buf, &self.entity);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ComponentReader::new(bytes);
        let attribute = read_attribute(&mut reader)?;
        let kind = reader.next_kind()?;
        let value_bytes = reader.next_bytes()?;
        let entity = read_entity(&mut reader)?;
        reader.finish()?;
        Ok(Self {
            attribute,
            value: PackedValue {
                kind,
                bytes: value_bytes,
            },
            entity,
        })
    }

    /// Unpacks the indexed value.
    pub fn unpack_value(&self) -> Result<Value, DecodeError> {
        unpack(self.value.kind.as_u8(), &self.value.bytes)
    }
}

/// Leading components of an index key to scan for.
///
/// Components can only be supplied left to right: attribute, then value,
/// then entity. Rows match when every supplied component is equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexPrefix {
    attribute: AttributeName,
    value: Option<PackedValue>,
    entity: Option<EntityId>,
}

impl IndexPrefix {
    /// Every row of `attribute`, whatever its value.
    pub fn attribute(attribute: AttributeName) -> Self {
        Self {
            attribute,
            value: None,
            entity: None,
        }
    }

    /// Rows of `attribute` equal to `value` (kind included).
    pub fn attribute_value(attribute: AttributeName, value: &Value) -> Self {
        Self {
            attribute,
            value: Some(pack(value)),
            entity: None,
        }
    }

    /// The single row `(attribute, value, entity)`, if present.
    pub fn exact(attribute: AttributeName, value: &Value, entity: EntityId) -> Self {
        Self {
            attribute,
            value: Some(pack(value)),
            entity: Some(entity),
        }
    }

    pub fn attribute_name(&self) -> &AttributeName {
        &self.attribute
    }

    /// Encodes the supplied components only; a seek to these bytes lands on
    /// the first row that can match.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(64);
        push_attribute(&mut buf, &self.attribute);
        if let Some(value) = &self.value {
            push_component(&mut buf, &[value.kind.as_u8()]);
            push_component(&mut buf, &value.bytes);
            if let Some(entity) = &self.entity {
                push_entity(&mut buf, entity);
            }
        }
        buf
    }

    /// Component-wise comparison against a decoded row key.
    pub fn matches(&self, key: &IndexKey) -> bool {
        if key.attribute.namespace() != self.attribute.namespace()
            || key.attribute.field() != self.attribute.field()
        {
            return false;
        }
        if let Some(value) = &self.value {
            if key.value.kind != value.kind || key.value.bytes != value.bytes {
                return false;
            }
        }
        if let Some(entity) = &self.entity {
            if key.entity.namespace() != entity.namespace() || key.entity.local() != entity.local()
            {
                return false;
            }
        }
        true
    }
}
