//! `Session`: the read/write surface of a [`TupleSpace`].
//!
//! A session owns one cursor pool per relation. It is not `Sync`: the
//! pipeline is single-threaded and a cursor is never shared between two
//! running scans.

use crate::column_families::cf_names;

use super::core::TupleSpace;
use super::cursor::CursorPool;

/// Borrowing handle carrying the cursor pools.
///
/// Operations live in `entity_ops` (primary relation) and `index_ops`
/// (secondary index).
pub struct Session<'a> {
    pub(crate) space: &'a TupleSpace,
    pub(crate) tuples: CursorPool<'a>,
    pub(crate) index: CursorPool<'a>,
}

impl<'a> Session<'a> {
    pub(crate) fn new(space: &'a TupleSpace) -> Self {
        let capacity = space.config().cursor_pool_size;
        Self {
            space,
            tuples: CursorPool::new(space, cf_names::TUPLES, capacity),
            index: CursorPool::new(space, cf_names::TUPLES_INDEX, capacity),
        }
    }

    pub fn space(&self) -> &'a TupleSpace {
        self.space
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.space.path())
            .field("idle_tuple_cursors", &self.tuples.idle_count())
            .field("idle_index_cursors", &self.index.idle_count())
            .finish()
    }
}
