//! Sotoki Core
//!
//! Shared vocabulary for the sotoki tuple store and everything built on it.
//!
//! # Architecture
//! - `types`: Value model (`Value`, `ValueKind`) and structured keys
//!   (`EntityId`, `AttributeName`)
//! - `config`: Layered configuration (`SotokiConfig`)
//! - `error`: `CoreError` and `CoreResult`

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    BuildConfig, IndexMaintenance, LoadConfig, LoggingConfig, RecordSetConfig, SotokiConfig,
    StorageConfig,
};
pub use error::{CoreError, CoreResult};
pub use types::{AttributeName, EntityId, Value, ValueKind};
