//! Tag derivation: the load-time second pass.
//!
//! Tags only exist as a `<a><b>` list inside question records, so the
//! reverse lookup needs tuples of its own:
//!
//! ```text
//! Tag:<name>                  Tag/name       = <name>
//! TagLink/<name>:<questionId> TagLink/<name> = <questionId>
//! ```

use std::collections::BTreeSet;

use sotoki_core::{AttributeName, EntityId, Value};
use tracing::{info, instrument};

use crate::error::{JoinContext, QueryResult};
use crate::repository::{namespaces, PostRepository, TAG_NAME_FIELD};

/// Counts from one derivation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagReport {
    /// Questions visited.
    pub questions: usize,
    /// Questions whose tag list could be parsed.
    pub tagged_questions: usize,
    /// Distinct tag names written.
    pub tags: usize,
    /// `TagLink` tuples written.
    pub links: usize,
}

pub fn tag_entity(tag: &str) -> EntityId {
    EntityId::new(namespaces::TAG, tag)
}

pub fn tag_link_entity(tag: &str, question_id: &str) -> EntityId {
    EntityId::new(format!("{}/{}", namespaces::TAG_LINK, tag), question_id)
}

pub fn tag_link_attribute(tag: &str) -> AttributeName {
    AttributeName::new(namespaces::TAG_LINK, tag)
}

/// Writes `Tag` and `TagLink` tuples for every tag of every question.
///
/// Questions are read to completion before the first write.
#[instrument(skip(repository))]
pub fn derive_tags(repository: &PostRepository<'_>) -> QueryResult<TagReport> {
    let mut report = TagReport::default();
    let mut pending: Vec<(String, Vec<String>)> = Vec::new();

    for question in repository.questions()? {
        let question = question?;
        report.questions += 1;
        if let Some(tags) = question.tags {
            report.tagged_questions += 1;
            pending.push((question.entity.id.local().to_string(), tags));
        }
    }

    let session = repository.session();
    let name_attribute = AttributeName::new(namespaces::TAG, TAG_NAME_FIELD);
    let mut seen = BTreeSet::new();

    for (question_id, tags) in &pending {
        for tag in tags {
            if seen.insert(tag.clone()) {
                session
                    .insert(&tag_entity(tag), &name_attribute, &Value::text(tag.as_str()))
                    .during("derive_tags")?;
            }
            session
                .insert(
                    &tag_link_entity(tag, question_id),
                    &tag_link_attribute(tag),
                    &Value::text(question_id.as_str()),
                )
                .during("derive_tags")?;
            report.links += 1;
        }
    }
    report.tags = seen.len();

    info!(
        questions = report.questions,
        tags = report.tags,
        links = report.links,
        "Derived tag tuples"
    );
    Ok(report)
}
