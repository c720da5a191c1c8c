//! Reconstructed records handed to the renderer.
//!
//! Records serialize as flat JSON objects: the stored fields (namespace
//! stripped) plus the joined extras (`Author`, `Tags`, `Kind`). A context is
//! `{post, relatedItems, comments, answers}`.

use serde::ser::{Serialize, SerializeMap, Serializer};
use sotoki_core::{EntityId, Value};
use sotoki_storage::Entity;

/// A post with its author and parsed tag list attached.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    pub entity: Entity,
    pub author: Option<Entity>,
    /// `None` when the post has no `Tags` field or it is not a `<a><b>` list.
    pub tags: Option<Vec<String>>,
}

impl Post {
    pub fn id(&self) -> &EntityId {
        &self.entity.id
    }

    /// Local part of the id, the form other records reference posts by.
    pub fn local_id(&self) -> &str {
        self.entity.id.local()
    }

    pub fn title(&self) -> Option<&str> {
        self.entity.text("Title")
    }

    /// `Score`, or 0 when missing or not an integer.
    pub fn score(&self) -> i64 {
        self.entity.integer("Score").unwrap_or(0)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(|a| a.text("DisplayName"))
    }
}

/// Splits a `<a><b><c>` tag list. Anything else is left unparsed.
pub fn parse_tag_list(raw: &str) -> Option<Vec<String>> {
    let inner = raw.strip_prefix('<')?.strip_suffix('>')?;
    if inner.is_empty() {
        return None;
    }
    Some(inner.split("><").map(str::to_string).collect())
}

/// A post reached through a `PostLink`, with the link's type.
#[derive(Clone, Debug, PartialEq)]
pub struct RelatedPost {
    pub post: Post,
    /// `LinkTypeId` of the link row.
    pub kind: Option<Value>,
}

/// A comment whose author resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub entity: Entity,
    pub author: Entity,
}

impl Comment {
    pub fn creation_date(&self) -> Option<&str> {
        self.entity.text("CreationDate")
    }
}

/// An answer post with its own comment thread.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Answer {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Everything the question page template receives.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PageContext {
    pub post: Post,
    #[serde(rename = "relatedItems")]
    pub related_items: Vec<RelatedPost>,
    pub comments: Vec<Comment>,
    pub answers: Vec<Answer>,
}

struct Fields<'e>(&'e Entity);

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.attributes.iter())
    }
}

fn serialize_post_fields<M: SerializeMap>(post: &Post, map: &mut M) -> Result<(), M::Error> {
    for (field, value) in &post.entity.attributes {
        // the parsed list replaces the raw field
        if field == "Tags" && post.tags.is_some() {
            continue;
        }
        map.serialize_entry(field, value)?;
    }
    map.serialize_entry("Author", &post.author.as_ref().map(Fields))?;
    if let Some(tags) = &post.tags {
        map.serialize_entry("Tags", tags)?;
    }
    Ok(())
}

impl Serialize for Post {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        serialize_post_fields(self, &mut map)?;
        map.end()
    }
}

impl Serialize for RelatedPost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        serialize_post_fields(&self.post, &mut map)?;
        map.serialize_entry("Kind", &self.kind)?;
        map.end()
    }
}

impl Serialize for Comment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, value) in &self.entity.attributes {
            map.serialize_entry(field, value)?;
        }
        map.serialize_entry("Author", &Fields(&self.author))?;
        map.end()
    }
}
