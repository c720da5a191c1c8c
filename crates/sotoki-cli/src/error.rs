//! Top-level error and exit codes.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Operational error (input, config, IO, engine) |
//! | 2 | Corrupt stored data (`DecodeError`) |

use sotoki_core::CoreError;
use sotoki_storage::StorageError;
use thiserror::Error;

use crate::build::BuildError;
use crate::loader::LoadError;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_CORRUPTION: i32 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("Load failed: {0}")]
    Load(#[from] LoadError),

    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Load(e) => e.is_corruption(),
            Self::Build(e) => e.is_corruption(),
            Self::Storage(e) => e.is_corruption(),
            Self::Config(_) | Self::Output(_) => false,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_corruption() {
            EXIT_CORRUPTION
        } else {
            EXIT_ERROR
        }
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code_for_error(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<CliError>()
        .map(CliError::exit_code)
        .unwrap_or(EXIT_ERROR)
}
