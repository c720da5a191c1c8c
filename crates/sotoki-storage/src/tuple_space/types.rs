//! Read results of the tuple store.

use std::collections::BTreeMap;

use serde::Serialize;
use sotoki_core::{AttributeName, EntityId, Value};

use crate::codec::PrimaryKey;

/// All attributes stored for one entity, keyed by field name.
///
/// An id with no rows yields an empty entity, not an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entity {
    pub id: EntityId,
    pub attributes: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            attributes: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Field as text, when it is stored as `Text`.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    /// Field as an integer, when it is stored as `Integer`.
    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_integer)
    }
}

/// One secondary index row.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexEntry {
    pub attribute: AttributeName,
    pub value: Value,
    pub entity: EntityId,
    /// Primary key of the row this index row was written for.
    pub backpointer: PrimaryKey,
}
