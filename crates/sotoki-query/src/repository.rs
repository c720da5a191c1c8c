//! `PostRepository`: every join the site needs, each a fixed sequence of
//! index scans and entity lookups.
//!
//! # Joins
//! | Join | Scan | Then |
//! |------|------|------|
//! | user | `User/Id = id` | `get_entity` of the first match |
//! | post | - | `get_entity`, user on `OwnerUserId`, split `Tags` |
//! | related | `PostLink/PostId = id` | post on each link's `RelatedPostId` |
//! | comments | `Comment/PostId = id` | user on `UserId`, drop unresolved |
//! | answers | `Post/ParentID = id` | post + comments of each answer |
//! | questions | `Post/PostTypeId = marker` | post of each match |
//! | questions_for_tag | `TagLink/<tag>` | post of each linked question |
//!
//! Nothing is cached: reconstructing the same post twice runs every scan
//! twice.

use std::cmp::Reverse;

use chrono::NaiveDateTime;
use sotoki_core::{AttributeName, EntityId, Value};
use sotoki_storage::{Entity, IndexPrefix, IndexScan, Session, StorageError};
use tracing::{debug, instrument, warn};

use crate::error::{JoinContext, QueryResult};
use crate::types::{parse_tag_list, Answer, Comment, PageContext, Post, RelatedPost};

/// Record-set namespaces the joins read from.
pub mod namespaces {
    pub const POST: &str = "Post";
    pub const COMMENT: &str = "Comment";
    pub const POST_LINK: &str = "PostLink";
    pub const USER: &str = "User";
    pub const TAG: &str = "Tag";
    pub const TAG_LINK: &str = "TagLink";
}

use namespaces::{COMMENT, POST, POST_LINK, TAG, TAG_LINK, USER};

/// Field of `Tag:<name>` entities holding the tag name.
pub const TAG_NAME_FIELD: &str = "name";

/// Read side of the site model.
pub struct PostRepository<'a> {
    session: Session<'a>,
    question_type_marker: String,
}

impl<'a> PostRepository<'a> {
    pub fn new(session: Session<'a>, question_type_marker: impl Into<String>) -> Self {
        Self {
            session,
            question_type_marker: question_type_marker.into(),
        }
    }

    pub fn session(&self) -> &Session<'a> {
        &self.session
    }

    pub fn question_type_marker(&self) -> &str {
        &self.question_type_marker
    }

    /// Index scan that treats an empty index as "no rows".
    fn scan(
        &self,
        prefix: IndexPrefix,
        join: &'static str,
    ) -> QueryResult<Option<IndexScan<'_, 'a>>> {
        match self.session.query(prefix) {
            Ok(scan) => Ok(Some(scan)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e).during(join),
        }
    }

    fn entity(&self, id: &EntityId, join: &'static str) -> QueryResult<Option<Entity>> {
        match self.session.get_entity(id) {
            Ok(entity) if entity.is_empty() => Ok(None),
            Ok(entity) => Ok(Some(entity)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e).during(join),
        }
    }

    /// User whose `Id` field equals `user_id`.
    pub fn user(&self, user_id: &str) -> QueryResult<Option<Entity>> {
        let prefix = IndexPrefix::attribute_value(
            AttributeName::new(USER, "Id"),
            &Value::text(user_id),
        );
        let Some(mut scan) = self.scan(prefix, "user")? else {
            return Ok(None);
        };
        let Some(first) = scan.next().transpose().during("user")? else {
            return Ok(None);
        };
        drop(scan);
        self.entity(&first.backpointer.entity, "user")
    }

    /// Reconstructs a post. `None` if the id has no rows.
    pub fn post(&self, id: &EntityId) -> QueryResult<Option<Post>> {
        let Some(entity) = self.entity(id, "post")? else {
            return Ok(None);
        };
        let author = match entity.text("OwnerUserId") {
            Some(owner) => self.user(owner)?,
            None => None,
        };
        let tags = entity.text("Tags").and_then(parse_tag_list);
        Ok(Some(Post {
            entity,
            author,
            tags,
        }))
    }

    /// Posts linked from `post_id`, highest score first.
    #[instrument(skip(self))]
    pub fn related(&self, post_id: &str) -> QueryResult<Vec<RelatedPost>> {
        let prefix = IndexPrefix::attribute_value(
            AttributeName::new(POST_LINK, "PostId"),
            &Value::text(post_id),
        );
        let link_ids = self.matching_entities(prefix, "related")?;

        let mut items = Vec::with_capacity(link_ids.len());
        for link_id in link_ids {
            let Some(link) = self.entity(&link_id, "related")? else {
                continue;
            };
            let Some(target) = link.text("RelatedPostId") else {
                warn!(link = %link_id, "Post link without RelatedPostId");
                continue;
            };
            match self.post(&EntityId::new(POST, target))? {
                Some(post) => items.push(RelatedPost {
                    post,
                    kind: link.get("LinkTypeId").cloned(),
                }),
                None => debug!(
                    link = %link_id,
                    related_post = target,
                    "Related post not in store, skipped"
                ),
            }
        }
        items.sort_by_key(|item| Reverse(item.post.score()));
        Ok(items)
    }

    /// Comments on `post_id` whose author resolves, oldest first.
    #[instrument(skip(self))]
    pub fn comments(&self, post_id: &str) -> QueryResult<Vec<Comment>> {
        let prefix = IndexPrefix::attribute_value(
            AttributeName::new(COMMENT, "PostId"),
            &Value::text(post_id),
        );
        let comment_ids = self.matching_entities(prefix, "comments")?;

        let mut comments = Vec::with_capacity(comment_ids.len());
        for comment_id in comment_ids {
            let Some(entity) = self.entity(&comment_id, "comments")? else {
                continue;
            };
            let author = match entity.text("UserId") {
                Some(user_id) => self.user(user_id)?,
                None => None,
            };
            match author {
                Some(author) => comments.push(Comment { entity, author }),
                None => debug!(comment = %comment_id, "Comment author unresolved, dropped"),
            }
        }
        comments.sort_by_cached_key(|c| creation_key(c.creation_date()));
        Ok(comments)
    }

    /// Answers to `post_id` with their comments, highest score first.
    #[instrument(skip(self))]
    pub fn answers(&self, post_id: &str) -> QueryResult<Vec<Answer>> {
        let prefix = IndexPrefix::attribute_value(
            AttributeName::new(POST, "ParentID"),
            &Value::text(post_id),
        );
        let answer_ids = self.matching_entities(prefix, "answers")?;

        let mut answers = Vec::with_capacity(answer_ids.len());
        for answer_id in answer_ids {
            let Some(post) = self.post(&answer_id)? else {
                continue;
            };
            let comments = self.comments(post.local_id())?;
            answers.push(Answer { post, comments });
        }
        answers.sort_by_key(|a| Reverse(a.post.score()));
        Ok(answers)
    }

    /// Lazily reconstructs every question, in id order.
    pub fn questions(&self) -> QueryResult<Questions<'_, 'a>> {
        let prefix = IndexPrefix::attribute_value(
            AttributeName::new(POST, "PostTypeId"),
            &Value::text(self.question_type_marker.as_str()),
        );
        Ok(Questions {
            repository: self,
            scan: self.scan(prefix, "questions")?,
        })
    }

    /// Number of question rows, without reconstructing any post.
    pub fn question_count(&self) -> QueryResult<usize> {
        let prefix = IndexPrefix::attribute_value(
            AttributeName::new(POST, "PostTypeId"),
            &Value::text(self.question_type_marker.as_str()),
        );
        Ok(self.matching_entities(prefix, "question_count")?.len())
    }

    /// Names of all derived tags, alphabetical.
    ///
    /// Index order is length-first for text values, so the names are sorted
    /// after the scan.
    pub fn tags(&self) -> QueryResult<Vec<String>> {
        let prefix = IndexPrefix::attribute(AttributeName::new(TAG, TAG_NAME_FIELD));
        let Some(scan) = self.scan(prefix, "tags")? else {
            return Ok(Vec::new());
        };
        let mut names = Vec::new();
        for entry in scan {
            if let Value::Text(name) = entry.during("tags")?.value {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Questions carrying `tag`, via the derived `TagLink` tuples.
    #[instrument(skip(self))]
    pub fn questions_for_tag(&self, tag: &str) -> QueryResult<Vec<Post>> {
        let prefix = IndexPrefix::attribute(AttributeName::new(TAG_LINK, tag));
        let Some(scan) = self.scan(prefix, "questions_for_tag")? else {
            return Ok(Vec::new());
        };
        let question_ids: Vec<String> = scan
            .map(|entry| entry.map(|e| e.value.to_string()))
            .collect::<Result<_, StorageError>>()
            .during("questions_for_tag")?;

        let mut posts = Vec::with_capacity(question_ids.len());
        for question_id in question_ids {
            if let Some(post) = self.post(&EntityId::new(POST, question_id))? {
                posts.push(post);
            }
        }
        Ok(posts)
    }

    /// Assembles the question page context.
    #[instrument(skip(self, question), fields(question = %question.id()))]
    pub fn page_context(&self, question: Post) -> QueryResult<PageContext> {
        let id = question.local_id().to_string();
        Ok(PageContext {
            related_items: self.related(&id)?,
            comments: self.comments(&id)?,
            answers: self.answers(&id)?,
            post: question,
        })
    }

    /// Entity ids of every index row under `prefix`, scan drained first so
    /// the follow-up lookups do not hold an index cursor.
    fn matching_entities(
        &self,
        prefix: IndexPrefix,
        join: &'static str,
    ) -> QueryResult<Vec<EntityId>> {
        let Some(scan) = self.scan(prefix, join)? else {
            return Ok(Vec::new());
        };
        scan.map(|entry| entry.map(|e| e.entity))
            .collect::<Result<_, StorageError>>()
            .during(join)
    }
}

/// Sort key for `CreationDate`: parsable timestamps first in time order,
/// anything else after them in text order.
fn creation_key(raw: Option<&str>) -> (bool, Option<NaiveDateTime>, String) {
    let raw = raw.unwrap_or_default();
    let parsed = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok();
    (parsed.is_none(), parsed, raw.to_string())
}

/// Lazy stream of reconstructed questions.
pub struct Questions<'r, 'a> {
    repository: &'r PostRepository<'a>,
    scan: Option<IndexScan<'r, 'a>>,
}

impl Iterator for Questions<'_, '_> {
    type Item = QueryResult<Post>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.scan.as_mut()?.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e).during("questions")),
            };
            match self.repository.post(&entry.entity) {
                Ok(Some(post)) => return Some(Ok(post)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
