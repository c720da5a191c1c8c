//! `TupleSpace`: owner of the RocksDB instance.
//!
//! ```text
//! TupleSpace
//! ├── DB (RocksDB instance)
//! │   ├── CF: tuples        - (entity, attribute) -> (kind, packed value)
//! │   └── CF: tuples_index  - (attribute, kind, value, entity) -> backpointer
//! ├── Cache (LRU block cache shared by both CFs)
//! └── write generation (bumped on every committed insert)
//! ```
//!
//! The store is single-writer. Reads go through a [`Session`], which borrows
//! the `TupleSpace` and keeps the cursor pools.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use rocksdb::{Cache, ColumnFamily, Options, WriteBatch, WriteOptions, DB};
use sotoki_core::StorageConfig;
use tracing::{debug, info, instrument};

use crate::column_families::{cf_names, get_column_family_descriptors};

use super::error::{StorageError, StorageResult};
use super::session::Session;

/// On-disk tuple store: primary relation plus secondary index.
pub struct TupleSpace {
    pub(crate) db: DB,

    /// Kept alive for the database lifetime.
    #[allow(dead_code)]
    cache: Cache,

    path: String,
    config: StorageConfig,
    generation: AtomicU64,
}

impl TupleSpace {
    /// Creates a fresh store at `path`.
    ///
    /// # Errors
    /// - `StorageError::AlreadyExists` if `path` exists (file or directory)
    /// - `StorageError::OpenFailed` if RocksDB cannot create the database
    #[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
    pub fn create<P: AsRef<Path>>(path: P, config: StorageConfig) -> StorageResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(StorageError::AlreadyExists {
                path: path.display().to_string(),
            });
        }
        let space = Self::open_inner(path, config, true)?;
        info!(path = %space.path, "Created tuple store");
        Ok(space)
    }

    /// Opens an existing store.
    ///
    /// # Errors
    /// - `StorageError::OpenFailed` if nothing exists at `path`, or RocksDB
    ///   refuses to open it (locked, corrupt, missing column families)
    #[instrument(skip(path, config), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P, config: StorageConfig) -> StorageResult<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(StorageError::OpenFailed {
                path: path.display().to_string(),
                message: "store directory does not exist".to_string(),
            });
        }
        let space = Self::open_inner(path, config, false)?;
        debug!(path = %space.path, "Opened tuple store");
        Ok(space)
    }

    fn open_inner(path: &Path, config: StorageConfig, create: bool) -> StorageResult<Self> {
        let path_str = path.to_string_lossy().to_string();
        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(create);
        db_opts.create_missing_column_families(create);
        db_opts.set_max_open_files(config.max_open_files);

        let cf_descriptors = get_column_family_descriptors(&cache);
        let db = DB::open_cf_descriptors(&db_opts, &path_str, cf_descriptors).map_err(|e| {
            StorageError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            db,
            cache,
            path: path_str,
            config,
            generation: AtomicU64::new(0),
        })
    }

    /// Starts a session with empty cursor pools.
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }

    pub fn get_cf(&self, name: &str) -> StorageResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::cf_not_found(name))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Number of write batches committed through this handle.
    ///
    /// Cursors are point-in-time views; pooled cursors from an older
    /// generation are discarded rather than reused.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Verifies that both column families are accessible.
    pub fn health_check(&self) -> StorageResult<()> {
        for cf_name in cf_names::ALL {
            self.get_cf(cf_name)?;
        }
        Ok(())
    }

    /// Flushes both column families' memtables to SST files.
    pub fn flush_all(&self) -> StorageResult<()> {
        for cf_name in cf_names::ALL {
            let cf = self.get_cf(cf_name)?;
            self.db.flush_cf(cf)?;
        }
        Ok(())
    }

    /// Flushes and releases the database.
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn close(self) -> StorageResult<()> {
        self.flush_all()?;
        info!(generation = self.generation(), "Closed tuple store");
        Ok(())
    }

    /// Commits one write batch and advances the write generation.
    pub(crate) fn write(&self, batch: WriteBatch) -> StorageResult<()> {
        let mut opts = WriteOptions::default();
        opts.disable_wal(!self.config.enable_wal);
        self.db.write_opt(batch, &opts)?;
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

impl std::fmt::Debug for TupleSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TupleSpace")
            .field("path", &self.path)
            .field("generation", &self.generation())
            .finish()
    }
}
