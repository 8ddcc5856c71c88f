//! Content Store adapter
//!
//! Maps a blog's body to a path-addressed blob. The blob's access grant is
//! the content side's only publish signal: public-read means published,
//! private means redacted. Title rides along as object metadata.

use crate::model::{Blog, BlogKey};
use crate::store::{Access, BlobBackend};
use crate::{Error, Result};
use bytes::Bytes;
use log::debug;
use std::collections::HashMap;

/// What the content side knows about a blog
#[derive(Clone, Debug)]
pub struct ContentRecord {
    /// Body content
    pub content: String,
    /// Title carried as blob metadata, when present
    pub title: Option<String>,
    /// Derived from the blob's access grant
    pub published: bool,
    /// The blob's last-modified time, unix millis
    pub updated_at: u64,
}

/// Capability interface for blog content persistence
pub trait ContentStore {
    /// Fetch the content half of a blog
    fn get(&self, key: &BlogKey) -> Result<ContentRecord>;

    /// Store the body; the access grant is set from `blog.published` as a
    /// side effect of the write
    fn write(&self, blog: &Blog) -> Result<()>;

    /// Overwrite only the body, leaving the access grant unchanged
    fn revise(&self, key: &BlogKey, content: &str) -> Result<()>;

    /// Grant public read on the blob, leaving the body untouched
    fn publish(&self, key: &BlogKey) -> Result<()>;

    /// Revoke public read on the blob, leaving the body untouched
    fn redact(&self, key: &BlogKey) -> Result<()>;

    /// Remove the blob entirely. Exposed as a capability for external
    /// callers; the reconciled read/write path never invokes it.
    fn delete(&self, key: &BlogKey) -> Result<()>;
}

/// Blob path for a blog key; identical across every operation
fn blob_path(key: &BlogKey) -> String {
    format!("{}/{}.json", key.author_id, key.blog_id)
}

fn access_for(published: bool) -> Access {
    if published {
        Access::PublicRead
    } else {
        Access::Private
    }
}

/// Content store backed by a blob backend
pub struct BlobContentStore<B> {
    backend: B,
}

impl<B: BlobBackend> BlobContentStore<B> {
    pub fn new(backend: B) -> Self {
        BlobContentStore { backend }
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: BlobBackend> ContentStore for BlobContentStore<B> {
    fn get(&self, key: &BlogKey) -> Result<ContentRecord> {
        let blob = self.backend.get(&blob_path(key))?;

        let content = String::from_utf8(blob.body.to_vec())
            .map_err(|e| Error::Record(format!("blog body at {} is not UTF-8: {}", key, e)))?;

        Ok(ContentRecord {
            content,
            title: blob.metadata.get("title").cloned(),
            published: blob.access == Access::PublicRead,
            updated_at: blob.last_modified,
        })
    }

    fn write(&self, blog: &Blog) -> Result<()> {
        let key = blog.key()?;
        let metadata = HashMap::from([("title".to_string(), blog.title.clone())]);

        debug!("writing content object at {}", blob_path(&key));
        self.backend.put(
            &blob_path(&key),
            Bytes::from(blog.content.clone().into_bytes()),
            metadata,
            access_for(blog.published),
        )
    }

    fn revise(&self, key: &BlogKey, content: &str) -> Result<()> {
        debug!("revising content object at {}", blob_path(key));
        self.backend
            .put_body(&blob_path(key), Bytes::copy_from_slice(content.as_bytes()))
    }

    fn publish(&self, key: &BlogKey) -> Result<()> {
        self.backend.set_access(&blob_path(key), Access::PublicRead)
    }

    fn redact(&self, key: &BlogKey) -> Result<()> {
        self.backend.set_access(&blob_path(key), Access::Private)
    }

    fn delete(&self, key: &BlogKey) -> Result<()> {
        self.backend.delete(&blob_path(key))
    }
}
