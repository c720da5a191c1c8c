//! Structured composite keys.
//!
//! Entity ids and attribute names are pairs, never concatenated strings. The
//! `namespace:local` and `namespace/field` forms exist for display and for
//! command-line input only; the storage layer encodes each part as its own
//! key component, so ids may contain `:` or `/` freely.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// Identifier of an entity: a record-set namespace plus a local id.
///
/// `EntityId::new("Post", "123")` displays as `Post:123`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    namespace: String,
    local: String,
}

impl EntityId {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// Parses the `namespace:local` display form, splitting at the last `:`.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let (namespace, local) =
            raw.rsplit_once(':')
                .ok_or_else(|| CoreError::InvalidEntityId {
                    raw: raw.to_string(),
                    reason: "missing ':' separator".to_string(),
                })?;
        if namespace.is_empty() || local.is_empty() {
            return Err(CoreError::InvalidEntityId {
                raw: raw.to_string(),
                reason: "namespace and local id must be non-empty".to_string(),
            });
        }
        Ok(Self::new(namespace, local))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.local)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Name of an attribute: the record set it came from plus the field name.
///
/// `AttributeName::new("Post", "OwnerUserId")` displays as `Post/OwnerUserId`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct AttributeName {
    namespace: String,
    field: String,
}

impl AttributeName {
    pub fn new(namespace: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            field: field.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.field)
    }
}
