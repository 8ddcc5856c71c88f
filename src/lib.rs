//! # parchment
//!
//! Dual-store persistence for blog entities.
//!
//! A blog is split across two independent backends: a document store holds
//! the structured metadata (title, author, publish flag, timestamps,
//! comments) and an object store holds the body content, with the object's
//! access grant doubling as the publish signal. The [`Reconciler`] composes
//! the two halves behind one [`BlogService`] contract without attempting
//! distributed-transaction semantics: every operation is a fixed-order chain
//! of one call per store.
//!
//! ## Example
//!
//! ```ignore
//! use parchment::{Blog, BlogService, BlobContentStore, DocumentMetadataStore,
//!                 MemoryBlobs, MemoryDocuments, Reconciler};
//!
//! let service = Reconciler::new(
//!     DocumentMetadataStore::new(MemoryDocuments::new()),
//!     BlobContentStore::new(MemoryBlobs::new()),
//! );
//! service.write(&Blog::new("auth1", "test", "Test Blog", "A great blog"))?;
//! let blog = service.get("auth1", "test")?;
//! ```

pub mod content;
pub mod meta;
pub mod model;
pub mod service;
pub mod store;

mod error;

pub use content::{BlobContentStore, ContentRecord, ContentStore};
pub use error::{Error, Result};
pub use meta::{DocumentMetadataStore, MetadataStore};
pub use model::{Blog, BlogKey, Comment};
pub use service::{BlogService, Reconciler};
pub use store::{
    Access, BlobBackend, Document, DocumentBackend, DocumentKey, FileBlobs, FileDocuments,
    MemoryBlobs, MemoryDocuments, StoredBlob,
};
