//! Cursor pools and search-near positioning.
//!
//! A cursor is a RocksDB raw iterator over one column family. Each relation
//! keeps a small free list of idle cursors; a cursor is checked out for one
//! scan and checked back in when the scan is drained or dropped. Raw
//! iterators see the database as of their creation, so every pooled cursor
//! carries the write generation it was created at and is discarded on
//! checkout once the store has moved on.

use std::cell::{Cell, RefCell};
use std::fmt;

use rocksdb::DBRawIterator;
use tracing::trace;

use super::core::TupleSpace;
use super::error::{StorageError, StorageResult};

/// Outcome of [`search_near`], relative to the target key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearMatch {
    /// Cursor sits on the target key.
    Exact,
    /// Cursor sits on the smallest key greater than the target.
    After,
    /// No key is >= target; cursor sits on the last key of the relation.
    Before,
}

/// Positions `iter` on the smallest key >= `target`.
///
/// # Errors
/// - `StorageError::NotFound` if the relation has no rows at all
/// - `StorageError::Engine` if the iterator reports a failure
pub(crate) fn search_near(
    iter: &mut DBRawIterator<'_>,
    target: &[u8],
    relation: &'static str,
    described: &dyn fmt::Display,
) -> StorageResult<NearMatch> {
    iter.seek(target);
    iter.status()?;
    if let Some(key) = iter.key() {
        return Ok(if key == target {
            NearMatch::Exact
        } else {
            NearMatch::After
        });
    }

    iter.seek_to_last();
    iter.status()?;
    if iter.valid() {
        Ok(NearMatch::Before)
    } else {
        Err(StorageError::not_found(relation, described.to_string()))
    }
}

/// A raw iterator plus the write generation it observes.
pub(crate) struct PooledCursor<'a> {
    pub(crate) iter: DBRawIterator<'a>,
    generation: u64,
}

/// Free list of idle cursors over one column family.
pub(crate) struct CursorPool<'a> {
    space: &'a TupleSpace,
    relation: &'static str,
    capacity: usize,
    idle: RefCell<Vec<PooledCursor<'a>>>,
    opened: Cell<usize>,
}

impl<'a> CursorPool<'a> {
    pub(crate) fn new(space: &'a TupleSpace, relation: &'static str, capacity: usize) -> Self {
        Self {
            space,
            relation,
            capacity,
            idle: RefCell::new(Vec::with_capacity(capacity)),
            opened: Cell::new(0),
        }
    }

    pub(crate) fn relation(&self) -> &'static str {
        self.relation
    }

    /// Takes an idle cursor of the current generation, or opens a new one.
    pub(crate) fn checkout(&self) -> StorageResult<PooledCursor<'a>> {
        let generation = self.space.generation();
        let mut idle = self.idle.borrow_mut();
        let before = idle.len();
        idle.retain(|cursor| cursor.generation == generation);
        if idle.len() < before {
            trace!(
                relation = self.relation,
                discarded = before - idle.len(),
                "Discarded stale cursors"
            );
        }
        if let Some(cursor) = idle.pop() {
            return Ok(cursor);
        }
        drop(idle);

        let cf = self.space.get_cf(self.relation)?;
        let iter = self.space.db.raw_iterator_cf(cf);
        self.opened.set(self.opened.get() + 1);
        Ok(PooledCursor { iter, generation })
    }

    /// Returns a cursor to the free list; beyond capacity it is closed.
    pub(crate) fn checkin(&self, cursor: PooledCursor<'a>) {
        let mut idle = self.idle.borrow_mut();
        if idle.len() < self.capacity && cursor.generation == self.space.generation() {
            idle.push(cursor);
        }
    }

    pub(crate) fn idle_count(&self) -> usize {
        self.idle.borrow().len()
    }

    /// Cursors opened by this pool since the session started.
    pub(crate) fn opened_count(&self) -> usize {
        self.opened.get()
    }
}
