//! Error types for sotoki-core.
//!
//! This module defines [`CoreError`], used for configuration loading and
//! for parsing the display forms of structured keys.
//!
//! # Examples
//!
//! ```rust
//! use sotoki_core::{CoreError, EntityId};
//!
//! let result = EntityId::parse("no-separator");
//! assert!(matches!(result, Err(CoreError::InvalidEntityId { .. })));
//! ```

use thiserror::Error;

/// Top-level error type for sotoki-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration is invalid or could not be loaded.
    ///
    /// # When This Occurs
    ///
    /// - A config file cannot be read or parsed
    /// - A value fails validation (e.g. `storage.cursor_pool_size = 0`)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An entity id display form could not be parsed.
    ///
    /// Entity ids are written as `namespace:local`; both parts must be non-empty.
    #[error("Invalid entity id '{raw}': {reason}")]
    InvalidEntityId {
        /// The text that failed to parse
        raw: String,
        /// Why it was rejected
        reason: String,
    },
}

impl From<config::ConfigError> for CoreError {
    fn from(e: config::ConfigError) -> Self {
        CoreError::ConfigError(e.to_string())
    }
}

/// Result alias for sotoki-core operations.
pub type CoreResult<T> = Result<T, CoreError>;
