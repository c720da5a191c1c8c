//! RocksDB-backed tuple store.
//!
//! # Relations
//! - `tuples`: (entity, attribute) -> (kind, packed value)
//! - `tuples_index`: (attribute, kind, packed value, entity) -> backpointer
//!
//! # Operations
//! - `Session::insert()`: primary row + index row in one write batch
//! - `Session::get_entity()`: prefix scan over one entity's rows
//! - `Session::query()`: lazy prefix-range scan of the index
//!
//! # Module Structure
//! - `core`: `TupleSpace` with create/open/close/health
//! - `session`: `Session`, the per-phase handle owning the cursor pools
//! - `cursor`: cursor pools and search-near positioning
//! - `entity_ops`: primary relation operations
//! - `index_ops`: index range queries (`IndexScan`)
//! - `types`: `Entity`, `IndexEntry`
//! - `error`: `StorageError`

mod core;
mod cursor;
mod entity_ops;
mod error;
mod index_ops;
mod session;
mod types;

#[cfg(test)]
mod tests_core;
#[cfg(test)]
mod tests_cursor;
#[cfg(test)]
mod tests_entity;
#[cfg(test)]
mod tests_index;

pub use self::core::TupleSpace;
pub use cursor::NearMatch;
pub use error::{StorageError, StorageResult};
pub use index_ops::IndexScan;
pub use session::Session;
pub use types::{Entity, IndexEntry};
