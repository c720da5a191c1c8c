//! Page rendering.
//!
//! The build pipeline only talks to [`PageRenderer`]. The shipped
//! [`TemplateRenderer`] does no templating of its own: it drops the JSON
//! context into the page at the `{{ context }}` marker and leaves the rest to
//! client-side code.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sotoki_query::PageContext;
use thiserror::Error;

pub const POST_TEMPLATE: &str = "post.html";
pub const INDEX_TEMPLATE: &str = "index.html";
pub const CONTEXT_MARKER: &str = "{{ context }}";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {path}")]
    MissingTemplate { path: String },

    #[error("Template {template} has no {marker} marker")]
    MissingMarker {
        template: String,
        marker: &'static str,
    },

    #[error("Failed to serialize page context: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Row of the index page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QuestionSummary {
    pub id: String,
    pub title: String,
    pub score: i64,
    /// `score` with thousands grouped by spaces.
    pub score_display: String,
    /// Style class from [`scale`].
    pub score_class: &'static str,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub answers: usize,
    pub comments: usize,
}

impl QuestionSummary {
    pub fn from_context(context: &PageContext) -> Self {
        let post = &context.post;
        Self {
            id: post.local_id().to_string(),
            title: post.title().unwrap_or_default().to_string(),
            score: post.score(),
            score_display: intspace(post.score()),
            score_class: scale(post.score()),
            author: post.author_name().map(str::to_string),
            tags: post.tags.clone().unwrap_or_default(),
            answers: context.answers.len(),
            comments: context.comments.len(),
        }
    }
}

/// Context of the index page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexContext {
    pub questions: Vec<QuestionSummary>,
}

/// Seam between the build pipeline and the template engine.
pub trait PageRenderer {
    fn render_question(&self, context: &PageContext, output: &Path) -> Result<(), RenderError>;

    fn render_index(&self, context: &IndexContext, output: &Path) -> Result<(), RenderError>;
}

/// Renders by substituting the serialized context into `post.html` and
/// `index.html`.
#[derive(Clone, Debug)]
pub struct TemplateRenderer {
    post: String,
    index: String,
}

impl TemplateRenderer {
    /// Reads both templates from `templates`.
    pub fn from_dir(templates: &Path) -> Result<Self, RenderError> {
        Ok(Self {
            post: read_template(templates.join(POST_TEMPLATE))?,
            index: read_template(templates.join(INDEX_TEMPLATE))?,
        })
    }

    fn write<C: Serialize>(
        &self,
        template: &str,
        context: &C,
        output: &Path,
    ) -> Result<(), RenderError> {
        // "</" would close an enclosing <script> element early
        let json = serde_json::to_string(context)?.replace("</", "<\\/");
        let page = template.replace(CONTEXT_MARKER, &json);
        fs::write(output, page).map_err(|source| RenderError::Write {
            path: output.display().to_string(),
            source,
        })
    }
}

fn read_template(path: PathBuf) -> Result<String, RenderError> {
    if !path.is_file() {
        return Err(RenderError::MissingTemplate {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(&path)?;
    if !text.contains(CONTEXT_MARKER) {
        return Err(RenderError::MissingMarker {
            template: path.display().to_string(),
            marker: CONTEXT_MARKER,
        });
    }
    Ok(text)
}

impl PageRenderer for TemplateRenderer {
    fn render_question(&self, context: &PageContext, output: &Path) -> Result<(), RenderError> {
        self.write(&self.post, context, output)
    }

    fn render_index(&self, context: &IndexContext, output: &Path) -> Result<(), RenderError> {
        self.write(&self.index, context, output)
    }
}

/// Groups digits by thousands with spaces: `1234567` -> `1 234 567`.
pub fn intspace(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Style class for a score: arrows and comment scores are coloured by it.
pub fn scale(number: i64) -> &'static str {
    match number {
        n if n < 0 => "negative",
        0 => "zero",
        1..=2 => "positive",
        3..=7 => "good",
        _ => "verygood",
    }
}
