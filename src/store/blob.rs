//! Blob backend - path-addressed object storage
//!
//! Models the slice of an object store the content adapter needs: bodies
//! addressed by path, a per-object metadata map, an access grant, and a
//! last-modified timestamp. The access grant is the only publish signal the
//! blob side carries.

use crate::model::now_millis;
use crate::{Error, Result};
use bytes::Bytes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Access grant on a stored object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    /// Only the owner may read
    Private,
    /// Anyone may read
    PublicRead,
}

/// A stored object together with its backend-owned attributes
#[derive(Clone, Debug)]
pub struct StoredBlob {
    /// Raw body bytes
    pub body: Bytes,
    /// Object-level metadata (string keys and values)
    pub metadata: HashMap<String, String>,
    /// Current access grant
    pub access: Access,
    /// Stamped by the backend on put/put_body, unix millis
    pub last_modified: u64,
}

/// Capability interface for the blob backend
pub trait BlobBackend {
    /// Fetch the object at the path; `NotFound` when absent
    fn get(&self, path: &str) -> Result<StoredBlob>;

    /// Create or fully replace the object at the path
    fn put(
        &self,
        path: &str,
        body: Bytes,
        metadata: HashMap<String, String>,
        access: Access,
    ) -> Result<()>;

    /// Replace only the body, leaving metadata and access untouched.
    /// `NotFound` when the object does not exist.
    fn put_body(&self, path: &str, body: Bytes) -> Result<()>;

    /// Change only the access grant. `NotFound` when the object does not exist.
    fn set_access(&self, path: &str, access: Access) -> Result<()>;

    /// Remove the object. Succeeds when the object is already absent.
    fn delete(&self, path: &str) -> Result<()>;
}

/// In-memory blob backend
#[derive(Default)]
pub struct MemoryBlobs {
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl MemoryBlobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl BlobBackend for MemoryBlobs {
    fn get(&self, path: &str) -> Result<StoredBlob> {
        let blobs = self.blobs.read();
        blobs
            .get(path)
            .cloned()
            .ok_or_else(|| Error::NotFound(path.to_string()))
    }

    fn put(
        &self,
        path: &str,
        body: Bytes,
        metadata: HashMap<String, String>,
        access: Access,
    ) -> Result<()> {
        let mut blobs = self.blobs.write();
        blobs.insert(
            path.to_string(),
            StoredBlob {
                body,
                metadata,
                access,
                last_modified: now_millis(),
            },
        );
        Ok(())
    }

    fn put_body(&self, path: &str, body: Bytes) -> Result<()> {
        let mut blobs = self.blobs.write();
        let blob = blobs
            .get_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        blob.body = body;
        blob.last_modified = now_millis();
        Ok(())
    }

    fn set_access(&self, path: &str, access: Access) -> Result<()> {
        let mut blobs = self.blobs.write();
        let blob = blobs
            .get_mut(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        blob.access = access;
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let mut blobs = self.blobs.write();
        blobs.remove(path);
        Ok(())
    }
}

/// Sidecar attributes persisted next to each body file
#[derive(Serialize, Deserialize)]
struct HeadRecord {
    access: Access,
    metadata: HashMap<String, String>,
    last_modified: u64,
}

/// File-backed blob backend
///
/// Bodies live at `<root>/<path>`; access, metadata, and last-modified live in
/// a `.head` JSON sidecar next to each body.
pub struct FileBlobs {
    root: PathBuf,
}

impl FileBlobs {
    /// Open the store rooted at the given directory, creating it when missing
    pub fn open_or_create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(FileBlobs { root })
    }

    fn body_path(&self, path: &str) -> Result<PathBuf> {
        // Object paths are relative and must stay inside the root.
        if path.is_empty() || path.split('/').any(|c| c.is_empty() || c == "." || c == "..") {
            return Err(Error::Backend(format!(
                "object path escapes store root: {}",
                path
            )));
        }
        Ok(self.root.join(path))
    }

    fn head_path(&self, path: &str) -> Result<PathBuf> {
        let mut head = self.body_path(path)?.into_os_string();
        head.push(".head");
        Ok(PathBuf::from(head))
    }

    fn read_head(&self, path: &str) -> Result<HeadRecord> {
        let head_path = self.head_path(path)?;
        if !head_path.exists() {
            return Err(Error::NotFound(path.to_string()));
        }
        let data = std::fs::read_to_string(&head_path)?;
        serde_json::from_str(&data)
            .map_err(|e| Error::Record(format!("object head {}: {}", path, e)))
    }

    fn write_head(&self, path: &str, head: &HeadRecord) -> Result<()> {
        let data = serde_json::to_string_pretty(head)?;
        let mut file = File::create(self.head_path(path)?)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }

    fn write_body(&self, path: &str, body: &[u8]) -> Result<()> {
        let body_path = self.body_path(path)?;
        if let Some(parent) = body_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&body_path)?;
        file.write_all(body)?;
        file.sync_all()?;
        Ok(())
    }
}

impl BlobBackend for FileBlobs {
    fn get(&self, path: &str) -> Result<StoredBlob> {
        let body_path = self.body_path(path)?;
        if !body_path.exists() {
            return Err(Error::NotFound(path.to_string()));
        }

        let head = self.read_head(path)?;
        let body = std::fs::read(&body_path)?;

        Ok(StoredBlob {
            body: Bytes::from(body),
            metadata: head.metadata,
            access: head.access,
            last_modified: head.last_modified,
        })
    }

    fn put(
        &self,
        path: &str,
        body: Bytes,
        metadata: HashMap<String, String>,
        access: Access,
    ) -> Result<()> {
        self.write_body(path, &body)?;
        self.write_head(
            path,
            &HeadRecord {
                access,
                metadata,
                last_modified: now_millis(),
            },
        )
    }

    fn put_body(&self, path: &str, body: Bytes) -> Result<()> {
        let mut head = self.read_head(path)?;
        self.write_body(path, &body)?;
        head.last_modified = now_millis();
        self.write_head(path, &head)
    }

    fn set_access(&self, path: &str, access: Access) -> Result<()> {
        let mut head = self.read_head(path)?;
        head.access = access;
        self.write_head(path, &head)
    }

    fn delete(&self, path: &str) -> Result<()> {
        for target in [self.body_path(path)?, self.head_path(path)?] {
            match std::fs::remove_file(&target) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}
