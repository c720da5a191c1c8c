//! Secondary index range queries.
//!
//! `query` is the only join primitive: the same scan answers "every entity
//! with attribute X" and "every entity where X = V". Results come in index
//! order: attribute, kind, packed value, then entity id.

use rocksdb::DBRawIterator;
use tracing::{debug, instrument};

use crate::codec::{IndexKey, IndexPrefix, PrimaryKey};

use super::cursor::{search_near, CursorPool, NearMatch, PooledCursor};
use super::error::StorageResult;
use super::session::Session;
use super::types::IndexEntry;

impl<'a> Session<'a> {
    /// Starts a lazy scan of the index rows matching `prefix`.
    ///
    /// A prefix with no matching rows gives an empty scan.
    ///
    /// # Errors
    /// - `StorageError::NotFound` if the index relation is empty
    /// - `StorageError::Engine` if positioning fails
    #[instrument(skip(self), fields(attribute = %prefix.attribute_name()))]
    pub fn query(&self, prefix: IndexPrefix) -> StorageResult<IndexScan<'_, 'a>> {
        let mut cursor = self.index.checkout()?;
        let target = prefix.encode();
        let positioned = search_near(
            &mut cursor.iter,
            &target,
            self.index.relation(),
            prefix.attribute_name(),
        );
        let near = match positioned {
            Ok(near) => near,
            Err(e) => {
                self.index.checkin(cursor);
                return Err(e);
            }
        };
        if near == NearMatch::Before {
            cursor.iter.next();
        }
        debug!(near = ?near, "Positioned index cursor");

        Ok(IndexScan {
            pool: &self.index,
            cursor: Some(cursor),
            prefix,
        })
    }

    /// Drains [`query`](Self::query) into a vector of entries.
    pub fn query_all(&self, prefix: IndexPrefix) -> StorageResult<Vec<IndexEntry>> {
        self.query(prefix)?.collect()
    }
}

/// Lazy sequence of index rows matching one prefix.
///
/// Holds an index cursor until the scan ends or is dropped; the cursor then
/// goes back to the session's pool.
pub struct IndexScan<'s, 'a> {
    pool: &'s CursorPool<'a>,
    cursor: Option<PooledCursor<'a>>,
    prefix: IndexPrefix,
}

impl<'s, 'a> IndexScan<'s, 'a> {
    pub fn prefix(&self) -> &IndexPrefix {
        &self.prefix
    }

    fn release(&mut self) {
        if let Some(cursor) = self.cursor.take() {
            self.pool.checkin(cursor);
        }
    }

    fn read_row(
        iter: &DBRawIterator<'a>,
        prefix: &IndexPrefix,
    ) -> Option<StorageResult<IndexEntry>> {
        let key = iter.key()?;
        let index_key = match IndexKey::decode(key) {
            Ok(k) => k,
            Err(e) => return Some(Err(e.into())),
        };
        if !prefix.matches(&index_key) {
            return None;
        }
        Some(decode_entry(index_key, iter.value().unwrap_or_default()))
    }
}

fn decode_entry(index_key: IndexKey, backpointer: &[u8]) -> StorageResult<IndexEntry> {
    let backpointer = PrimaryKey::decode(backpointer)?;
    let value = index_key.unpack_value()?;
    Ok(IndexEntry {
        attribute: index_key.attribute,
        value,
        entity: index_key.entity,
        backpointer,
    })
}

impl<'s, 'a> Iterator for IndexScan<'s, 'a> {
    type Item = StorageResult<IndexEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;

        let row = Self::read_row(&cursor.iter, &self.prefix);
        match row {
            Some(Ok(entry)) => {
                cursor.iter.next();
                Some(Ok(entry))
            }
            Some(Err(e)) => {
                self.release();
                Some(Err(e))
            }
            None => {
                // end of relation or first divergent row
                let status = cursor.iter.status();
                self.release();
                status.err().map(|e| Err(e.into()))
            }
        }
    }
}

impl Drop for IndexScan<'_, '_> {
    fn drop(&mut self) {
        self.release();
    }
}
