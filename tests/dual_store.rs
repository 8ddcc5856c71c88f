//! End-to-end tests over the file-backed backends
//!
//! Exercises the full stack (reconciler → adapters → disk) including
//! persistence across reopening the stores, the way the CLI uses them.

use parchment::{
    Blog, BlogService, BlobContentStore, ContentStore, DocumentMetadataStore, Error, FileBlobs,
    FileDocuments, Reconciler,
};
use std::path::Path;
use tempfile::tempdir;

type FileService = Reconciler<DocumentMetadataStore<FileDocuments>, BlobContentStore<FileBlobs>>;

fn open_service(dir: &Path) -> FileService {
    let documents = FileDocuments::open_or_create(dir.join("blogs.json")).unwrap();
    let blobs = FileBlobs::open_or_create(dir.join("content")).unwrap();
    Reconciler::new(
        DocumentMetadataStore::new(documents),
        BlobContentStore::new(blobs),
    )
}

fn sample() -> Blog {
    Blog::new("auth1", "test", "Test Blog", "A great blog").with_published(true)
}

#[test]
fn test_write_survives_reopen() {
    let dir = tempdir().unwrap();

    {
        let service = open_service(dir.path());
        service.write(&sample()).unwrap();
    }

    let service = open_service(dir.path());
    let blog = service.get("auth1", "test").unwrap();
    assert_eq!(blog.title, "Test Blog");
    assert_eq!(blog.content, "A great blog");
    assert!(blog.published);
}

#[test]
fn test_revise_and_redact_across_reopen() {
    let dir = tempdir().unwrap();

    {
        let service = open_service(dir.path());
        service.write(&sample()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        service.revise("auth1", "test", "a better blog").unwrap();
    }

    {
        let service = open_service(dir.path());
        let blog = service.get("auth1", "test").unwrap();
        assert_eq!(blog.content, "a better blog");
        assert!(blog.published);
        service.redact("auth1", "test").unwrap();
    }

    let service = open_service(dir.path());
    let blog = service.get("auth1", "test").unwrap();
    assert!(!blog.published);
    assert_eq!(blog.content, "a better blog");
}

#[test]
fn test_created_at_pinned_across_processes() {
    let dir = tempdir().unwrap();

    let first = {
        let service = open_service(dir.path());
        service.write(&sample()).unwrap();
        service.get("auth1", "test").unwrap()
    };

    std::thread::sleep(std::time::Duration::from_millis(5));

    let service = open_service(dir.path());
    let mut again = sample();
    again.created_at = 1;
    service.write(&again).unwrap();

    let second = service.get("auth1", "test").unwrap();
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
}

#[test]
fn test_content_only_half_state_is_observable() {
    let dir = tempdir().unwrap();
    let service = open_service(dir.path());

    // Populate only the content half; the metadata record never exists.
    service.content().write(&sample()).unwrap();

    let err = service.get("auth1", "test").unwrap_err();
    assert!(matches!(err, Error::Meta { op: "get", .. }));
    assert!(err.is_not_found());
}
