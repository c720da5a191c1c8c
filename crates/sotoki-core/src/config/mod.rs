//! Configuration management for sotoki.

mod sub_configs;


use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

pub use sub_configs::{
    BuildConfig, IndexMaintenance, LoadConfig, LoggingConfig, RecordSetConfig, StorageConfig,
};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SotokiConfig {
    pub storage: StorageConfig,
    pub load: LoadConfig,
    pub build: BuildConfig,
    pub logging: LoggingConfig,
}

impl SotokiConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{SOTOKI_ENV}.toml (environment-specific)
    /// 3. Environment variables with SOTOKI__ prefix (e.g. `SOTOKI__STORAGE__CURSOR_POOL_SIZE`)
    pub fn load() -> CoreResult<Self> {
        let env = std::env::var("SOTOKI_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                config::Environment::with_prefix("SOTOKI")
                    .prefix_separator("__")
                    .separator("__"),
            );

        let config: SotokiConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CoreError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: SotokiConfig = toml::from_str(&content)
            .map_err(|e| CoreError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> CoreResult<()> {
        if self.storage.cursor_pool_size == 0 {
            return Err(CoreError::ConfigError(
                "storage.cursor_pool_size must be greater than 0".into(),
            ));
        }

        if self.storage.block_cache_size == 0 {
            return Err(CoreError::ConfigError(
                "storage.block_cache_size must be greater than 0".into(),
            ));
        }

        if self.load.record_sets.is_empty() {
            return Err(CoreError::ConfigError(
                "load.record_sets must list at least one record file".into(),
            ));
        }

        let mut names = HashSet::new();
        for set in &self.load.record_sets {
            if set.name.is_empty() || set.file.is_empty() {
                return Err(CoreError::ConfigError(
                    "load.record_sets entries need both `file` and `name`".into(),
                ));
            }
            if !names.insert(set.name.as_str()) {
                return Err(CoreError::ConfigError(format!(
                    "load.record_sets has duplicate record-set name '{}'",
                    set.name
                )));
            }
        }

        if self.load.question_type_marker.is_empty() {
            return Err(CoreError::ConfigError(
                "load.question_type_marker must not be empty".into(),
            ));
        }

        if self.build.max_pages == Some(0) {
            return Err(CoreError::ConfigError(
                "build.max_pages must be greater than 0 when set".into(),
            ));
        }

        Ok(())
    }
}
