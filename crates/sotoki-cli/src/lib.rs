//! Sotoki CLI library
//!
//! The pipelines behind the `sotoki` binary, usable without the command
//! line.
//!
//! - `loader`: `load` (XML dump to a fresh store, then tag derivation)
//! - `build`: `build` (questions to pages through a `PageRenderer`)
//! - `render`: `PageRenderer`, `TemplateRenderer`, display helpers
//! - `inspect`: one entity as JSON
//! - `logging`: tracing subscriber setup
//! - `error`: `CliError` and exit codes

pub mod build;
pub mod error;
pub mod inspect;
pub mod loader;
pub mod logging;
pub mod render;

pub use build::{build, BuildError, BuildReport};
pub use error::{exit_code_for_error, CliError, EXIT_CORRUPTION, EXIT_ERROR, EXIT_SUCCESS};
pub use inspect::inspect;
pub use loader::{load, LoadError, LoadReport, RecordSetReport};
pub use render::{
    intspace, scale, IndexContext, PageRenderer, QuestionSummary, RenderError, TemplateRenderer,
};
