//! Sotoki Storage
//!
//! Entity-attribute-value tuple store with an ordered secondary index,
//! persisted in RocksDB.
//!
//! # Architecture
//! - `codec`: value packing and composite key encoding
//! - `column_families`: the `tuples` and `tuples_index` column families
//! - `tuple_space`: `TupleSpace` (engine owner) and `Session` (operations)
//!
//! # Example
//!
//! ```rust
//! use sotoki_core::{AttributeName, EntityId, StorageConfig, Value};
//! use sotoki_storage::{IndexPrefix, TupleSpace};
//! use tempfile::TempDir;
//!
//! let tmp = TempDir::new().unwrap();
//! let space = TupleSpace::create(tmp.path().join("db"), StorageConfig::default()).unwrap();
//! let session = space.session();
//!
//! let post = EntityId::new("Post", "1");
//! let owner = AttributeName::new("Post", "OwnerUserId");
//! session.insert(&post, &owner, &Value::text("7")).unwrap();
//!
//! let entity = session.get_entity(&post).unwrap();
//! assert_eq!(entity.text("OwnerUserId"), Some("7"));
//!
//! let hits = session
//!     .query_all(IndexPrefix::attribute_value(owner, &Value::text("7")))
//!     .unwrap();
//! assert_eq!(hits[0].entity, post);
//! ```

pub mod codec;
pub mod column_families;
pub mod tuple_space;

pub use codec::{DecodeError, IndexKey, IndexPrefix, PackedValue, PrimaryKey};
pub use column_families::cf_names;
pub use tuple_space::{
    Entity, IndexEntry, IndexScan, NearMatch, Session, StorageError, StorageResult, TupleSpace,
};
