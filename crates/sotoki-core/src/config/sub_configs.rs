//! Sub-configuration structures for sotoki components.
//!
//! This module contains the individual configuration structs that make up
//! the main `SotokiConfig` structure.

use serde::{Deserialize, Serialize};

/// How the secondary index reacts when a primary row is overwritten.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexMaintenance {
    /// Write the new index row only. The row for the previous value stays
    /// behind and is still returned by index scans.
    #[default]
    AppendOnly,
    /// Delete the previous value's index row in the same write batch.
    Replace,
}

/// Tuple store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Shared LRU block cache size in bytes (default: 64MB).
    pub block_cache_size: usize,
    /// Maximum open files (default: 512).
    pub max_open_files: i32,
    /// Write-ahead logging (default: true).
    pub enable_wal: bool,
    /// Idle cursors kept per relation (default: 4).
    pub cursor_pool_size: usize,
    /// Overwrite policy for index rows (default: append_only).
    pub index_maintenance: IndexMaintenance,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            block_cache_size: 64 * 1024 * 1024,
            max_open_files: 512,
            enable_wal: true,
            cursor_pool_size: 4,
            index_maintenance: IndexMaintenance::AppendOnly,
        }
    }
}

/// One record file of a dump directory.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RecordSetConfig {
    /// File name inside the dump directory (e.g. `Posts.xml`).
    pub file: String,
    /// Record-set name used as entity and attribute namespace (e.g. `Post`).
    pub name: String,
}

impl RecordSetConfig {
    pub fn new(file: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
        }
    }
}

/// Load (ingestion) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Record sets in load order.
    pub record_sets: Vec<RecordSetConfig>,
    /// Field names coerced to integers when non-empty.
    pub integer_fields: Vec<String>,
    /// `Post/PostTypeId` value that marks a question.
    pub question_type_marker: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            record_sets: vec![
                RecordSetConfig::new("Posts.xml", "Post"),
                RecordSetConfig::new("Comments.xml", "Comment"),
                RecordSetConfig::new("PostLinks.xml", "PostLink"),
                RecordSetConfig::new("Users.xml", "User"),
            ],
            integer_fields: vec!["Score".to_string(), "FavoriteCount".to_string()],
            question_type_marker: "1".to_string(),
        }
    }
}

/// Build (rendering) configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Stop after this many question pages. `None` renders every question.
    pub max_pages: Option<usize>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when neither `-v` nor `RUST_LOG` is given.
    pub level: String,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            include_target: true,
        }
    }
}
