//! Reconciler - one blog service over two stores
//!
//! Composes a [`MetadataStore`] and a [`ContentStore`] into a single logical
//! service. Every operation is a fixed-order chain of one call per store with
//! no cross-store transaction: content first, then metadata. A failure in the
//! first call leaves the second store untouched; a failure in the second call
//! leaves the pair in a half-state that stays until the next successful write
//! to the same key. The only compensation performed is deleting a freshly
//! orphaned content object when the metadata half of a create fails.

use crate::content::ContentStore;
use crate::meta::MetadataStore;
use crate::model::{Blog, BlogKey};
use crate::{Error, Result};
use log::warn;

/// The contract exposed to upstream callers (HTTP handlers, CLI)
pub trait BlogService {
    /// Fetch a complete blog, merged from both stores
    fn get(&self, author_id: &str, blog_id: &str) -> Result<Blog>;

    /// Create or fully replace a blog in both stores
    fn write(&self, blog: &Blog) -> Result<()>;

    /// Replace the body content and bump the metadata timestamp
    fn revise(&self, author_id: &str, blog_id: &str, content: &str) -> Result<()>;

    /// Mark the blog published in both stores
    fn publish(&self, author_id: &str, blog_id: &str) -> Result<()>;

    /// Mark the blog unpublished in both stores
    fn redact(&self, author_id: &str, blog_id: &str) -> Result<()>;
}

/// Reconciles a metadata store and a content store into one [`BlogService`]
pub struct Reconciler<M, C> {
    meta: M,
    content: C,
}

impl<M: MetadataStore, C: ContentStore> Reconciler<M, C> {
    pub fn new(meta: M, content: C) -> Self {
        Reconciler { meta, content }
    }

    /// The metadata half
    pub fn meta(&self) -> &M {
        &self.meta
    }

    /// The content half
    pub fn content(&self) -> &C {
        &self.content
    }

    /// Best-effort cleanup after the metadata half of a write failed.
    ///
    /// Only a failed fresh create is compensated: deleting the content object
    /// after a failed overwrite would destroy the previous body. When the
    /// probe itself fails nothing is deleted and the half-state is left for
    /// the next successful write.
    fn compensate_write(&self, key: &BlogKey) {
        match self.meta.get(key) {
            Err(Error::NotFound(_)) => match self.content.delete(key) {
                Ok(()) => warn!("removed orphaned content object for {}", key),
                Err(err) => {
                    warn!("could not remove orphaned content object for {}: {}", key, err)
                }
            },
            Ok(_) => warn!(
                "metadata overwrite for {} failed after content write; stores may disagree",
                key
            ),
            Err(err) => warn!(
                "could not probe metadata for {} after failed write, leaving content in place: {}",
                key, err
            ),
        }
    }
}

impl<M: MetadataStore, C: ContentStore> BlogService for Reconciler<M, C> {
    fn get(&self, author_id: &str, blog_id: &str) -> Result<Blog> {
        let key = BlogKey::new(author_id, blog_id)?;

        let content = self
            .content
            .get(&key)
            .map_err(|e| Error::content("get", e))?;
        let mut blog = self.meta.get(&key).map_err(|e| Error::meta("get", e))?;

        // Metadata wins for every field except the body.
        blog.content = content.content;
        Ok(blog)
    }

    fn write(&self, blog: &Blog) -> Result<()> {
        let key = blog.key()?;

        self.content
            .write(blog)
            .map_err(|e| Error::content("write", e))?;

        if let Err(err) = self.meta.write(blog) {
            self.compensate_write(&key);
            return Err(Error::meta("write", err));
        }

        Ok(())
    }

    fn revise(&self, author_id: &str, blog_id: &str, content: &str) -> Result<()> {
        let key = BlogKey::new(author_id, blog_id)?;

        self.content
            .revise(&key, content)
            .map_err(|e| Error::content("revise", e))?;
        self.meta.revise(&key).map_err(|e| Error::meta("revise", e))
    }

    fn publish(&self, author_id: &str, blog_id: &str) -> Result<()> {
        let key = BlogKey::new(author_id, blog_id)?;

        self.content
            .publish(&key)
            .map_err(|e| Error::content("publish", e))?;
        self.meta
            .publish(&key)
            .map_err(|e| Error::meta("publish", e))
    }

    fn redact(&self, author_id: &str, blog_id: &str) -> Result<()> {
        let key = BlogKey::new(author_id, blog_id)?;

        self.content
            .redact(&key)
            .map_err(|e| Error::content("redact", e))?;
        self.meta.redact(&key).map_err(|e| Error::meta("redact", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BlobContentStore, ContentRecord};
    use crate::meta::DocumentMetadataStore;
    use crate::store::{MemoryBlobs, MemoryDocuments};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Metadata store double: delegates to a real in-memory store, with a
    /// fail switch per write and call counters
    struct FlakyMeta {
        inner: DocumentMetadataStore<MemoryDocuments>,
        fail_write: AtomicBool,
        write_called: AtomicUsize,
    }

    impl FlakyMeta {
        fn new() -> Self {
            FlakyMeta {
                inner: DocumentMetadataStore::new(MemoryDocuments::new()),
                fail_write: AtomicBool::new(false),
                write_called: AtomicUsize::new(0),
            }
        }
    }

    impl MetadataStore for FlakyMeta {
        fn get(&self, key: &BlogKey) -> Result<Blog> {
            self.inner.get(key)
        }

        fn write(&self, blog: &Blog) -> Result<()> {
            self.write_called.fetch_add(1, Ordering::SeqCst);
            if self.fail_write.load(Ordering::SeqCst) {
                return Err(Error::Backend("injected metadata failure".into()));
            }
            self.inner.write(blog)
        }

        fn revise(&self, key: &BlogKey) -> Result<()> {
            self.inner.revise(key)
        }

        fn publish(&self, key: &BlogKey) -> Result<()> {
            self.inner.publish(key)
        }

        fn redact(&self, key: &BlogKey) -> Result<()> {
            self.inner.redact(key)
        }
    }

    /// Content store double with a fail switch per write and a delete counter
    struct FlakyContent {
        inner: BlobContentStore<MemoryBlobs>,
        fail_write: AtomicBool,
        delete_called: AtomicUsize,
    }

    impl FlakyContent {
        fn new() -> Self {
            FlakyContent {
                inner: BlobContentStore::new(MemoryBlobs::new()),
                fail_write: AtomicBool::new(false),
                delete_called: AtomicUsize::new(0),
            }
        }
    }

    impl ContentStore for FlakyContent {
        fn get(&self, key: &BlogKey) -> Result<ContentRecord> {
            self.inner.get(key)
        }

        fn write(&self, blog: &Blog) -> Result<()> {
            if self.fail_write.load(Ordering::SeqCst) {
                return Err(Error::Backend("injected content failure".into()));
            }
            self.inner.write(blog)
        }

        fn revise(&self, key: &BlogKey, content: &str) -> Result<()> {
            self.inner.revise(key, content)
        }

        fn publish(&self, key: &BlogKey) -> Result<()> {
            self.inner.publish(key)
        }

        fn redact(&self, key: &BlogKey) -> Result<()> {
            self.inner.redact(key)
        }

        fn delete(&self, key: &BlogKey) -> Result<()> {
            self.delete_called.fetch_add(1, Ordering::SeqCst);
            self.inner.delete(key)
        }
    }

    fn service() -> Reconciler<DocumentMetadataStore<MemoryDocuments>, BlobContentStore<MemoryBlobs>>
    {
        Reconciler::new(
            DocumentMetadataStore::new(MemoryDocuments::new()),
            BlobContentStore::new(MemoryBlobs::new()),
        )
    }

    fn sample() -> Blog {
        Blog::new("auth1", "test", "Test Blog", "A great blog").with_published(true)
    }

    #[test]
    fn test_round_trip() {
        let service = service();
        service.write(&sample()).unwrap();

        let blog = service.get("auth1", "test").unwrap();
        assert_eq!(blog.id, "test");
        assert_eq!(blog.author_id, "auth1");
        assert_eq!(blog.title, "Test Blog");
        assert_eq!(blog.content, "A great blog");
        assert!(blog.published);
    }

    #[test]
    fn test_created_at_survives_a_rewrite() {
        let service = service();
        service.write(&sample()).unwrap();
        let first = service.get("auth1", "test").unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));

        let mut again = sample();
        again.created_at = 1;
        service.write(&again).unwrap();

        let second = service.get("auth1", "test").unwrap();
        assert_eq!(second.created_at, first.created_at);
    }

    #[test]
    fn test_publish_is_idempotent() {
        let service = service();
        service.write(&sample().with_published(false)).unwrap();

        service.publish("auth1", "test").unwrap();
        assert!(service.get("auth1", "test").unwrap().published);

        service.publish("auth1", "test").unwrap();
        let blog = service.get("auth1", "test").unwrap();
        assert!(blog.published);
        assert_eq!(blog.content, "A great blog");
    }

    #[test]
    fn test_redact_flips_only_the_flag() {
        let service = service();
        service.write(&sample()).unwrap();

        let before = service.get("auth1", "test").unwrap();
        assert_eq!(before.title, "Test Blog");
        assert!(!before.id.is_empty());

        service.redact("auth1", "test").unwrap();

        let after = service.get("auth1", "test").unwrap();
        assert!(!after.published);
        assert_eq!(after.content, before.content);
    }

    #[test]
    fn test_revise_preserves_identity() {
        let service = service();
        service.write(&sample()).unwrap();
        let before = service.get("auth1", "test").unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        service.revise("auth1", "test", "new body").unwrap();

        let after = service.get("auth1", "test").unwrap();
        assert_eq!(after.author_id, before.author_id);
        assert_eq!(after.id, before.id);
        assert_eq!(after.title, before.title);
        assert_eq!(after.published, before.published);
        assert_eq!(after.content, "new body");
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn test_content_failure_never_touches_metadata() {
        let meta = FlakyMeta::new();
        let content = FlakyContent::new();
        content.fail_write.store(true, Ordering::SeqCst);
        let service = Reconciler::new(meta, content);

        let err = service.write(&sample()).unwrap_err();
        assert!(matches!(err, Error::Content { op: "write", .. }));
        assert_eq!(service.meta().write_called.load(Ordering::SeqCst), 0);

        let key = BlogKey::new("auth1", "test").unwrap();
        assert!(matches!(service.meta().get(&key), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_failed_create_removes_orphaned_content() {
        let meta = FlakyMeta::new();
        meta.fail_write.store(true, Ordering::SeqCst);
        let service = Reconciler::new(meta, FlakyContent::new());

        let err = service.write(&sample()).unwrap_err();
        assert!(matches!(err, Error::Meta { op: "write", .. }));

        let key = BlogKey::new("auth1", "test").unwrap();
        assert_eq!(service.content().delete_called.load(Ordering::SeqCst), 1);
        assert!(matches!(
            service.content().get(&key),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_failed_overwrite_keeps_existing_content() {
        let meta = FlakyMeta::new();
        let service = Reconciler::new(meta, FlakyContent::new());
        service.write(&sample()).unwrap();

        service.meta().fail_write.store(true, Ordering::SeqCst);
        let mut again = sample();
        again.content = "second draft".to_string();
        let err = service.write(&again).unwrap_err();
        assert!(matches!(err, Error::Meta { op: "write", .. }));

        // No compensation on an overwrite; the new body stays put.
        let key = BlogKey::new("auth1", "test").unwrap();
        assert_eq!(service.content().delete_called.load(Ordering::SeqCst), 0);
        assert_eq!(service.content().get(&key).unwrap().content, "second draft");
    }

    #[test]
    fn test_get_error_names_the_failing_side() {
        let service = service();

        let err = service.get("auth1", "missing").unwrap_err();
        assert!(matches!(err, Error::Content { op: "get", .. }));
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Content store get failed"));
    }

    #[test]
    fn test_empty_key_components_are_rejected() {
        let service = service();
        assert!(matches!(
            service.get("", "test"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            service.publish("auth1", ""),
            Err(Error::InvalidKey(_))
        ));
    }
}
