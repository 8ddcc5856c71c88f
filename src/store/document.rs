//! Document backend - composite-key record storage
//!
//! Models the narrow slice of a document/key-value store the metadata adapter
//! needs: fetch by composite key, whole-record upsert, and targeted field
//! updates. Field updates upsert the record when the key is absent, matching
//! the update semantics of the document stores this stands in for.

use crate::{Error, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A stored record: a flat map of named fields
pub type Document = serde_json::Map<String, Value>;

/// Composite key addressing a document: partition + sort component
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DocumentKey {
    pub partition: String,
    pub sort: String,
}

impl DocumentKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        DocumentKey {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

impl std::fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.partition, self.sort)
    }
}

/// Capability interface for the document backend
pub trait DocumentBackend {
    /// Fetch a document; `None` when the key holds nothing
    fn get(&self, key: &DocumentKey) -> Result<Option<Document>>;

    /// Create or fully replace the document at the key
    fn put(&self, key: &DocumentKey, doc: Document) -> Result<()>;

    /// Set individual fields, leaving the rest of the record untouched.
    /// Upserts when the key is absent.
    fn update(&self, key: &DocumentKey, fields: &[(&str, Value)]) -> Result<()>;
}

/// In-memory document backend
#[derive(Default)]
pub struct MemoryDocuments {
    records: RwLock<HashMap<(String, String), Document>>,
}

impl MemoryDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl DocumentBackend for MemoryDocuments {
    fn get(&self, key: &DocumentKey) -> Result<Option<Document>> {
        let records = self.records.read();
        Ok(records
            .get(&(key.partition.clone(), key.sort.clone()))
            .cloned())
    }

    fn put(&self, key: &DocumentKey, doc: Document) -> Result<()> {
        let mut records = self.records.write();
        records.insert((key.partition.clone(), key.sort.clone()), doc);
        Ok(())
    }

    fn update(&self, key: &DocumentKey, fields: &[(&str, Value)]) -> Result<()> {
        let mut records = self.records.write();
        let doc = records
            .entry((key.partition.clone(), key.sort.clone()))
            .or_default();
        for (field, value) in fields {
            doc.insert((*field).to_string(), value.clone());
        }
        Ok(())
    }
}

/// File-backed document backend
///
/// Records live in one JSON file, partition → sort → document. The whole map
/// is held in memory and rewritten to disk after every mutation; reads never
/// touch the file after open.
pub struct FileDocuments {
    path: PathBuf,
    records: RwLock<HashMap<String, HashMap<String, Document>>>,
}

impl FileDocuments {
    /// Open the backing file, creating an empty store when it does not exist
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let records = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)
                .map_err(|e| Error::Record(format!("document file {}: {}", path.display(), e)))?
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            HashMap::new()
        };

        Ok(FileDocuments {
            path,
            records: RwLock::new(records),
        })
    }

    fn persist(&self, records: &HashMap<String, HashMap<String, Document>>) -> Result<()> {
        let data = serde_json::to_string_pretty(records)?;
        let mut file = File::create(&self.path)?;
        file.write_all(data.as_bytes())?;
        file.sync_all()?;
        Ok(())
    }
}

impl DocumentBackend for FileDocuments {
    fn get(&self, key: &DocumentKey) -> Result<Option<Document>> {
        let records = self.records.read();
        Ok(records
            .get(&key.partition)
            .and_then(|part| part.get(&key.sort))
            .cloned())
    }

    fn put(&self, key: &DocumentKey, doc: Document) -> Result<()> {
        let mut records = self.records.write();
        records
            .entry(key.partition.clone())
            .or_default()
            .insert(key.sort.clone(), doc);
        self.persist(&records)
    }

    fn update(&self, key: &DocumentKey, fields: &[(&str, Value)]) -> Result<()> {
        let mut records = self.records.write();
        let doc = records
            .entry(key.partition.clone())
            .or_default()
            .entry(key.sort.clone())
            .or_default();
        for (field, value) in fields {
            doc.insert((*field).to_string(), value.clone());
        }
        self.persist(&records)
    }
}
