//! Storage error types for the tuple store.
//!
//! Designed for fail-fast operation: apart from `NotFound`, which callers may
//! treat as an expected absence, every variant aborts the current phase.

use crate::codec::DecodeError;
use thiserror::Error;

/// Tuple store errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database failed to open.
    #[error("Failed to open database at '{path}': {message}")]
    OpenFailed { path: String, message: String },

    /// `create` was pointed at a directory that already exists.
    #[error("Store directory already exists: {path}")]
    AlreadyExists { path: String },

    /// Column family not found (should never happen if DB opened correctly).
    #[error("Column family '{name}' not found")]
    ColumnFamilyNotFound { name: String },

    /// A cursor could not be positioned: the relation is empty.
    #[error("Nothing found in {relation} for {target}")]
    NotFound {
        /// Relation the cursor was positioned in
        relation: &'static str,
        /// What was being looked for (display form)
        target: String,
    },

    /// Stored bytes do not match the codec format.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// RocksDB operation failed.
    #[error("RocksDB error: {0}")]
    Engine(#[from] rocksdb::Error),
}

impl StorageError {
    /// Create a not found error.
    pub fn not_found(relation: &'static str, target: impl Into<String>) -> Self {
        Self::NotFound {
            relation,
            target: target.into(),
        }
    }

    /// Create a column family not found error.
    pub fn cf_not_found(name: impl Into<String>) -> Self {
        Self::ColumnFamilyNotFound { name: name.into() }
    }

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error indicates corrupted stored data.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Result type for tuple store operations.
pub type StorageResult<T> = Result<T, StorageError>;
