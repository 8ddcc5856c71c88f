//! Metadata Store adapter
//!
//! Maps a blog's structured fields to and from a composite-key document
//! record. The metadata side is authoritative for existence, ownership,
//! publish state, and timestamps; body content is explicitly excluded from
//! the record and lives in the content store.

use crate::model::{now_millis, Blog, BlogKey, Comment};
use crate::store::{DocumentBackend, DocumentKey};
use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Capability interface for blog metadata persistence
pub trait MetadataStore {
    /// Fetch the metadata half of a blog. `NotFound` when the record is
    /// absent or carries an empty identity.
    fn get(&self, key: &BlogKey) -> Result<Blog>;

    /// Upsert the metadata record. Creation time is immutable: when a record
    /// already exists at the key, its `created_at` wins over the incoming one.
    fn write(&self, blog: &Blog) -> Result<()>;

    /// Bump `updated_at` only; the revised content lives elsewhere
    fn revise(&self, key: &BlogKey) -> Result<()>;

    /// Set the publish flag via a targeted field update
    fn publish(&self, key: &BlogKey) -> Result<()>;

    /// Clear the publish flag via a targeted field update
    fn redact(&self, key: &BlogKey) -> Result<()>;
}

/// On-disk shape of the metadata record
///
/// Every field defaults so half-written records still decode; an empty
/// `blog_id` after decoding is treated as "does not exist" in exactly one
/// place ([`DocumentMetadataStore::get`]).
#[derive(Debug, Default, Serialize, Deserialize)]
struct BlogRecord {
    #[serde(default)]
    blog_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author_id: String,
    #[serde(default)]
    published: bool,
    #[serde(default)]
    created_at: u64,
    #[serde(default)]
    updated_at: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deleted_at: Option<u64>,
    #[serde(default)]
    comments: Vec<Comment>,
}

impl BlogRecord {
    fn from_blog(blog: &Blog) -> Self {
        BlogRecord {
            blog_id: blog.id.clone(),
            title: blog.title.clone(),
            author_id: blog.author_id.clone(),
            published: blog.published,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
            deleted_at: blog.deleted_at,
            comments: blog.comments.clone(),
        }
    }

    fn into_blog(self) -> Blog {
        Blog {
            id: self.blog_id,
            title: self.title,
            author_id: self.author_id,
            content: String::new(),
            comments: self.comments,
            published: self.published,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

/// Metadata store backed by a document backend
pub struct DocumentMetadataStore<B> {
    backend: B,
}

impl<B: DocumentBackend> DocumentMetadataStore<B> {
    pub fn new(backend: B) -> Self {
        DocumentMetadataStore { backend }
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn encode(record: &BlogRecord) -> Result<serde_json::Map<String, Value>> {
        match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::Record(format!(
                "blog record encoded to non-object: {}",
                other
            ))),
        }
    }
}

fn document_key(key: &BlogKey) -> DocumentKey {
    DocumentKey::new(key.author_id.as_str(), key.blog_id.as_str())
}

impl<B: DocumentBackend> MetadataStore for DocumentMetadataStore<B> {
    fn get(&self, key: &BlogKey) -> Result<Blog> {
        let doc = self
            .backend
            .get(&document_key(key))?
            .ok_or_else(|| Error::NotFound(key.to_string()))?;

        let record: BlogRecord = serde_json::from_value(Value::Object(doc))?;

        // Empty identity means the record does not really exist, e.g. a stub
        // left behind by a targeted update against a missing key.
        if record.blog_id.is_empty() {
            return Err(Error::NotFound(key.to_string()));
        }

        Ok(record.into_blog())
    }

    fn write(&self, blog: &Blog) -> Result<()> {
        let key = blog.key()?;

        let now = now_millis();
        let mut record = BlogRecord::from_blog(blog);
        record.created_at = now;
        record.updated_at = now;

        // Read-before-write: an existing record pins created_at.
        match self.get(&key) {
            Ok(existing) => record.created_at = existing.created_at,
            Err(Error::NotFound(_)) => {}
            Err(err) => return Err(err),
        }

        debug!("writing metadata record for {}", key);
        self.backend.put(&document_key(&key), Self::encode(&record)?)
    }

    fn revise(&self, key: &BlogKey) -> Result<()> {
        debug!("bumping updated_at for {}", key);
        self.backend
            .update(&document_key(key), &[("updated_at", json!(now_millis()))])
    }

    fn publish(&self, key: &BlogKey) -> Result<()> {
        self.backend
            .update(&document_key(key), &[("published", json!(true))])
    }

    fn redact(&self, key: &BlogKey) -> Result<()> {
        self.backend
            .update(&document_key(key), &[("published", json!(false))])
    }
}
