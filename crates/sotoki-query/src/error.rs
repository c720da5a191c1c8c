//! Join layer errors.
//!
//! Expected absences (no owner, no comment author, no related rows) never
//! reach this type; they are resolved to `None` or skipped where they occur.

use sotoki_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// The tuple store failed underneath a join.
    #[error("Storage error during {join}: {source}")]
    Storage {
        join: &'static str,
        #[source]
        source: StorageError,
    },
}

impl QueryError {
    pub fn storage(join: &'static str, source: StorageError) -> Self {
        Self::Storage { join, source }
    }

    /// True when the underlying failure is corrupt stored data.
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Storage { source, .. } => source.is_corruption(),
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Attaches the join name to storage failures.
pub(crate) trait JoinContext<T> {
    fn during(self, join: &'static str) -> QueryResult<T>;
}

impl<T> JoinContext<T> for Result<T, StorageError> {
    fn during(self, join: &'static str) -> QueryResult<T> {
        self.map_err(|e| QueryError::storage(join, e))
    }
}
