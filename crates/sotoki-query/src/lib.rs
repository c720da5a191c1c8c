//! Sotoki Query
//!
//! Joins over the tuple store, written out by hand: there is no planner, so
//! each join is a fixed order of index scans and entity lookups.
//!
//! # Architecture
//! - `repository`: `PostRepository` (user, post, related, comments, answers,
//!   questions, tags, page context)
//! - `tags`: the tag derivation pass run after loading
//! - `types`: `Post`, `RelatedPost`, `Comment`, `Answer`, `PageContext`
//! - `error`: `QueryError`

pub mod error;
pub mod repository;
pub mod tags;
pub mod types;

pub use error::{QueryError, QueryResult};
pub use repository::{namespaces, PostRepository, Questions};
pub use tags::{derive_tags, TagReport};
pub use types::{parse_tag_list, Answer, Comment, PageContext, Post, RelatedPost};
