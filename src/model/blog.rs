//! Blog type - the unit of work persisted across both stores

use super::{now_millis, Comment};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Composite identity of a blog: `(author_id, blog_id)`
///
/// Both components are caller-supplied, opaque strings. The same key addresses
/// the metadata record in the document store and the body blob in the content
/// store; a blog is "complete" only when both stores hold it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlogKey {
    pub author_id: String,
    pub blog_id: String,
}

impl BlogKey {
    /// Create a key, rejecting empty components
    pub fn new(author_id: impl Into<String>, blog_id: impl Into<String>) -> Result<Self> {
        let author_id = author_id.into();
        let blog_id = blog_id.into();

        if author_id.is_empty() {
            return Err(Error::InvalidKey("author_id is empty".into()));
        }
        if blog_id.is_empty() {
            return Err(Error::InvalidKey("blog_id is empty".into()));
        }

        Ok(BlogKey { author_id, blog_id })
    }
}

impl std::fmt::Display for BlogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.author_id, self.blog_id)
    }
}

/// A blog entity, split across two stores at rest
///
/// The metadata store owns every field except `content`; the content store
/// owns `content`. Timestamps are unix milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Blog identifier, unique within an author
    pub id: String,

    /// Display title
    pub title: String,

    /// Owning author identifier
    pub author_id: String,

    /// Body content; lives in the content store, never in the metadata record
    pub content: String,

    /// Reader comments, insertion order preserved
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Whether the blog is publicly readable
    pub published: bool,

    /// Set on first successful write, immutable afterwards
    pub created_at: u64,

    /// Refreshed on every successful metadata write
    pub updated_at: u64,

    /// Soft-delete marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<u64>,
}

impl Blog {
    /// Create a new blog stamped with the current time
    pub fn new(
        author_id: impl Into<String>,
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = now_millis();

        Blog {
            id: id.into(),
            title: title.into(),
            author_id: author_id.into(),
            content: content.into(),
            comments: Vec::new(),
            published: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Set the publish flag
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Append a comment
    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }

    /// The composite key addressing this blog in both stores
    pub fn key(&self) -> Result<BlogKey> {
        BlogKey::new(self.author_id.as_str(), self.id.as_str())
    }
}
