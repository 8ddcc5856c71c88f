//! Backend storage layer
//!
//! Narrow capability traits standing in for the remote document and object
//! backends, with in-memory and file-backed implementations. The adapters in
//! [`crate::meta`] and [`crate::content`] are written against these traits
//! only, so the in-memory variants are interchangeable with the disk-backed
//! ones rather than being test-only doubles.

mod blob;
mod document;

pub use blob::{Access, BlobBackend, FileBlobs, MemoryBlobs, StoredBlob};
pub use document::{Document, DocumentBackend, DocumentKey, FileDocuments, MemoryDocuments};
