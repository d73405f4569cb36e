//! JSON-file backed document store
//!
//! Wraps a `MemoryStore` and rewrites one JSON file for every commit or
//! direct delete. The file is written before the new state is swapped into
//! memory, so a failed write leaves both untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::document::{Document, DocumentStore, StoreBatch, StoreError};
use super::file_io::{load_json, write_atomic};
use super::memory::{MemoryBatch, MemoryStore};
use super::path::{CollectionPath, DocPath};
use crate::error::JournalResult;

const STORE_SCHEMA_VERSION: u32 = 1;

/// On-disk layout of the store file, as read back
#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    documents: BTreeMap<String, Document>,
}

/// On-disk layout as written, borrowing the committed documents
#[derive(Serialize)]
struct StoreFileRef<'a> {
    schema_version: u32,
    documents: &'a BTreeMap<String, Document>,
}

/// Document store persisted to a single JSON file
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file doesn't exist yet
    pub fn open(path: impl Into<PathBuf>) -> JournalResult<Self> {
        let path = path.into();
        let file: StoreFile = load_json(&path)?.unwrap_or_default();
        debug!(path = %path.display(), documents = file.documents.len(), "opened store");
        Ok(Self {
            path,
            inner: MemoryStore::from_documents(file.documents),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory view of the store (fault injection lives here)
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    fn persist(&self, documents: &BTreeMap<String, Document>) -> Result<(), StoreError> {
        write_atomic(
            &self.path,
            &StoreFileRef {
                schema_version: STORE_SCHEMA_VERSION,
                documents,
            },
        )?;
        debug!(path = %self.path.display(), documents = documents.len(), "persisted store");
        Ok(())
    }
}

/// Write batch that persists the store file once committed
pub struct FileBatch<'a> {
    store: &'a JsonFileStore,
    inner: MemoryBatch<'a>,
}

impl StoreBatch for FileBatch<'_> {
    fn set(&mut self, path: DocPath, data: Document) {
        self.inner.set(path, data);
    }

    fn update(&mut self, path: DocPath, fields: Document) {
        self.inner.update(path, fields);
    }

    fn delete(&mut self, path: DocPath) {
        StoreBatch::delete(&mut self.inner, path);
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let FileBatch { store, inner } = *self;
        inner.commit_with(|working| store.persist(working))
    }
}

impl DocumentStore for JsonFileStore {
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        self.inner.get(path)
    }

    fn list(&self, collection: &CollectionPath) -> Result<Vec<(DocPath, Document)>, StoreError> {
        self.inner.list(collection)
    }

    fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        self.inner.delete_with(path, |working| self.persist(working))
    }

    fn begin_batch(&self) -> Box<dyn StoreBatch + '_> {
        Box::new(FileBatch {
            store: self,
            inner: MemoryBatch::new(&self.inner),
        })
    }
}
