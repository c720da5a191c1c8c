//! Build phase: tuples to pages.
//!
//! ```text
//! <output>/posts/<questionId>.html   one per question
//! <output>/index.html                summaries of the rendered questions
//! ```

use std::fs;
use std::path::Path;

use sotoki_core::SotokiConfig;
use sotoki_query::{PostRepository, QueryError};
use sotoki_storage::{StorageError, TupleSpace};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::render::{IndexContext, PageRenderer, QuestionSummary, RenderError};

pub const POSTS_DIR: &str = "posts";
pub const INDEX_PAGE: &str = "index.html";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Output directory already has a posts/ directory: {path}")]
    OutputExists { path: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub fn is_corruption(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_corruption(),
            Self::Query(e) => e.is_corruption(),
            _ => false,
        }
    }
}

/// Outcome of a build run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Rendered questions, in render order.
    pub rendered: Vec<QuestionSummary>,
    /// Questions left out by `build.max_pages`.
    pub skipped: usize,
}

/// Renders every question of the store at `database` into `output`.
///
/// # Errors
/// - `BuildError::Storage` if the store cannot be opened; nothing is
///   written under `output` in that case
/// - `BuildError::OutputExists` if `<output>/posts` already exists
/// - any join or render failure; the build stops at the first one
#[instrument(
    skip(config, renderer),
    fields(database = %database.display(), output = %output.display())
)]
pub fn build(
    database: &Path,
    output: &Path,
    config: &SotokiConfig,
    renderer: &dyn PageRenderer,
) -> Result<BuildReport, BuildError> {
    let space = TupleSpace::open(database, config.storage.clone())?;
    let repository =
        PostRepository::new(space.session(), config.load.question_type_marker.as_str());

    let posts_dir = output.join(POSTS_DIR);
    if posts_dir.exists() {
        return Err(BuildError::OutputExists {
            path: posts_dir.display().to_string(),
        });
    }
    fs::create_dir_all(&posts_dir)?;

    let mut report = BuildReport::default();
    let limit = config.build.max_pages.unwrap_or(usize::MAX);

    for question in repository.questions()?.take(limit) {
        let question = question?;
        let id = question.local_id().to_string();
        debug!(question = %id, "Rendering question");

        let context = repository.page_context(question)?;
        renderer.render_question(&context, &posts_dir.join(format!("{id}.html")))?;
        report.rendered.push(QuestionSummary::from_context(&context));
    }

    if let Some(max_pages) = config.build.max_pages {
        let total = repository.question_count()?;
        report.skipped = total.saturating_sub(report.rendered.len());
        if report.skipped > 0 {
            warn!(
                max_pages,
                total,
                skipped = report.skipped,
                "Page cap reached, remaining questions not rendered"
            );
        }
    }

    let index = IndexContext {
        questions: report.rendered.clone(),
    };
    renderer.render_index(&index, &output.join(INDEX_PAGE))?;

    info!(rendered = report.rendered.len(), "Build complete");
    Ok(report)
}
