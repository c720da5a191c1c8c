//! Primary relation operations: `insert` and `get_entity`.

use rocksdb::WriteBatch;
use sotoki_core::{AttributeName, EntityId, IndexMaintenance, Value};
use tracing::{debug, instrument, trace};

use crate::codec::{decode_row_value, encode_row_value, pack, IndexKey, PrimaryKey};
use crate::column_families::cf_names;

use super::cursor::{search_near, NearMatch};
use super::error::StorageResult;
use super::session::Session;
use super::types::Entity;

impl<'a> Session<'a> {
    /// Writes or overwrites `(entity, attribute) -> value`.
    ///
    /// The primary row and its index row are committed in one write batch.
    /// Under `IndexMaintenance::Replace` the index row of the previous value
    /// is deleted in that same batch; under `AppendOnly` it stays.
    ///
    /// # Errors
    /// - `StorageError::Engine` on a RocksDB write failure
    /// - `StorageError::Decode` if the previous value (read for `Replace`)
    ///   is corrupt
    #[instrument(skip(self, value), fields(entity = %entity, attribute = %attribute))]
    pub fn insert(
        &self,
        entity: &EntityId,
        attribute: &AttributeName,
        value: &Value,
    ) -> StorageResult<()> {
        let tuples = self.space.get_cf(cf_names::TUPLES)?;
        let index = self.space.get_cf(cf_names::TUPLES_INDEX)?;

        let primary_key = PrimaryKey::new(entity.clone(), attribute.clone()).encode();
        let packed = pack(value);

        let mut batch = WriteBatch::default();

        if self.space.config().index_maintenance == IndexMaintenance::Replace {
            if let Some(previous) = self.space.db.get_pinned_cf(tuples, &primary_key)? {
                let previous = pack(&decode_row_value(&previous)?);
                if previous != packed {
                    trace!(kind = %previous.kind, "Replacing index row of previous value");
                    let stale = IndexKey::new(attribute.clone(), previous, entity.clone());
                    batch.delete_cf(index, stale.encode());
                }
            }
        }

        batch.put_cf(tuples, &primary_key, encode_row_value(&packed));
        let index_key = IndexKey::new(attribute.clone(), packed, entity.clone());
        batch.put_cf(index, index_key.encode(), &primary_key);

        self.space.write(batch)?;
        trace!("Inserted tuple");
        Ok(())
    }

    /// Collects every attribute of `entity`, keyed by field name.
    ///
    /// Positions a cursor at-or-after the entity's first possible key and
    /// scans forward while rows belong to `entity`. An id with no rows gives
    /// an empty [`Entity`].
    ///
    /// # Errors
    /// - `StorageError::NotFound` if the primary relation is empty
    /// - `StorageError::Decode` on a corrupt row
    #[instrument(skip(self), fields(entity = %entity))]
    pub fn get_entity(&self, entity: &EntityId) -> StorageResult<Entity> {
        let mut cursor = self.tuples.checkout()?;
        let result = Self::collect_entity(&mut cursor.iter, entity);
        self.tuples.checkin(cursor);

        let found = result?;
        debug!(attributes = found.len(), "Reconstructed entity");
        Ok(found)
    }

    fn collect_entity(
        iter: &mut rocksdb::DBRawIterator<'a>,
        entity: &EntityId,
    ) -> StorageResult<Entity> {
        let prefix = PrimaryKey::entity_prefix(entity);
        let mut found = Entity::new(entity.clone());

        if search_near(iter, &prefix, cf_names::TUPLES, entity)? == NearMatch::Before {
            iter.next();
        }

        // components are self-delimiting, so a byte prefix match is an
        // entity match
        while let Some(key) = iter.key() {
            if !key.starts_with(&prefix) {
                break;
            }
            let row = PrimaryKey::decode(key)?;
            let value = iter.value().map(decode_row_value).transpose()?;
            if let Some(value) = value {
                found
                    .attributes
                    .insert(row.attribute.field().to_string(), value);
            }
            iter.next();
        }
        iter.status()?;

        Ok(found)
    }
}
