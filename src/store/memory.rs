//! In-memory document store
//!
//! Keeps every document in a single ordered map keyed by path. Commits are
//! applied to a working copy and swapped in only when every write succeeded.
//! Failures can be injected for commits and for queries under a path prefix.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, RwLock};

use super::document::{Document, DocumentStore, StoreBatch, StoreError, StoreErrorCode};
use super::path::{CollectionPath, DocPath};

#[derive(Debug, Default)]
struct Faults {
    commit_failures: VecDeque<StoreErrorCode>,
    failing_prefixes: Vec<String>,
    commit_attempts: u32,
}

/// Thread-safe in-memory document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<String, Document>>,
    faults: Mutex<Faults>,
}

fn poisoned() -> StoreError {
    StoreError::new(StoreErrorCode::Internal, "store lock poisoned")
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously persisted documents
    pub fn from_documents(docs: BTreeMap<String, Document>) -> Self {
        Self {
            docs: RwLock::new(docs),
            faults: Mutex::new(Faults::default()),
        }
    }

    /// Copy of every stored document, keyed by path
    pub fn documents(&self) -> Result<BTreeMap<String, Document>, StoreError> {
        Ok(self.docs.read().map_err(|_| poisoned())?.clone())
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make the next `times` commits fail with `code`
    pub fn fail_commits(&self, code: StoreErrorCode, times: usize) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.commit_failures.extend(std::iter::repeat(code).take(times));
        }
    }

    /// Make every list/query of a collection under `prefix` fail
    pub fn fail_queries_under(&self, prefix: impl Into<String>) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.failing_prefixes.push(prefix.into());
        }
    }

    /// How many times `commit` has been called on a batch of this store
    pub fn commit_attempts(&self) -> u32 {
        self.faults.lock().map(|f| f.commit_attempts).unwrap_or(0)
    }

    fn check_query_fault(&self, collection: &CollectionPath) -> Result<(), StoreError> {
        let faults = self.faults.lock().map_err(|_| poisoned())?;
        if faults
            .failing_prefixes
            .iter()
            .any(|p| collection.as_str().starts_with(p.as_str()))
        {
            return Err(StoreError::new(
                StoreErrorCode::Unavailable,
                format!("query on {} failed", collection),
            ));
        }
        Ok(())
    }

    /// Apply `writes` to a working copy, hand it to `persist`, then swap it in
    fn apply<F>(&self, writes: Vec<Write>, persist: F) -> Result<(), StoreError>
    where
        F: FnOnce(&BTreeMap<String, Document>) -> Result<(), StoreError>,
    {
        {
            let mut faults = self.faults.lock().map_err(|_| poisoned())?;
            faults.commit_attempts += 1;
            if let Some(code) = faults.commit_failures.pop_front() {
                return Err(StoreError::new(code, "injected commit failure"));
            }
        }

        let mut docs = self.docs.write().map_err(|_| poisoned())?;
        let mut working = docs.clone();

        for write in writes {
            match write {
                Write::Set(path, data) => {
                    working.insert(path.as_str().to_string(), data);
                }
                Write::Update(path, fields) => {
                    let existing = working.get_mut(path.as_str()).ok_or_else(|| {
                        StoreError::new(
                            StoreErrorCode::NotFound,
                            format!("no document to update at {}", path),
                        )
                    })?;
                    existing.extend(fields);
                }
                Write::Delete(path) => {
                    working.remove(path.as_str());
                }
            }
        }

        persist(&working)?;
        *docs = working;
        Ok(())
    }

    /// Remove one document, swapping the result in only once `persist` accepts it
    pub(crate) fn delete_with<F>(&self, path: &DocPath, persist: F) -> Result<(), StoreError>
    where
        F: FnOnce(&BTreeMap<String, Document>) -> Result<(), StoreError>,
    {
        let mut docs = self.docs.write().map_err(|_| poisoned())?;
        if !docs.contains_key(path.as_str()) {
            return Ok(());
        }
        let mut working = docs.clone();
        working.remove(path.as_str());
        persist(&working)?;
        *docs = working;
        Ok(())
    }
}

#[derive(Debug)]
enum Write {
    Set(DocPath, Document),
    Update(DocPath, Document),
    Delete(DocPath),
}

/// Write batch against a `MemoryStore`
pub struct MemoryBatch<'a> {
    store: &'a MemoryStore,
    writes: Vec<Write>,
}

impl<'a> MemoryBatch<'a> {
    pub(crate) fn new(store: &'a MemoryStore) -> Self {
        Self {
            store,
            writes: Vec::new(),
        }
    }

    /// Commit, letting `persist` veto the new state before it becomes visible
    pub(crate) fn commit_with<F>(self, persist: F) -> Result<(), StoreError>
    where
        F: FnOnce(&BTreeMap<String, Document>) -> Result<(), StoreError>,
    {
        self.store.apply(self.writes, persist)
    }
}

impl StoreBatch for MemoryBatch<'_> {
    fn set(&mut self, path: DocPath, data: Document) {
        self.writes.push(Write::Set(path, data));
    }

    fn update(&mut self, path: DocPath, fields: Document) {
        self.writes.push(Write::Update(path, fields));
    }

    fn delete(&mut self, path: DocPath) {
        self.writes.push(Write::Delete(path));
    }

    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        (*self).commit_with(|_| Ok(()))
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError> {
        let docs = self.docs.read().map_err(|_| poisoned())?;
        Ok(docs.get(path.as_str()).cloned())
    }

    fn list(&self, collection: &CollectionPath) -> Result<Vec<(DocPath, Document)>, StoreError> {
        self.check_query_fault(collection)?;
        let docs = self.docs.read().map_err(|_| poisoned())?;
        let prefix = format!("{}/", collection);
        Ok(docs
            .range(prefix.clone()..)
            .take_while(|(path, _)| path.starts_with(&prefix))
            .filter(|(path, _)| collection.contains(path))
            .map(|(path, doc)| (DocPath::from_raw(path.clone()), doc.clone()))
            .collect())
    }

    fn delete(&self, path: &DocPath) -> Result<(), StoreError> {
        self.delete_with(path, |_| Ok(()))
    }

    fn begin_batch(&self) -> Box<dyn StoreBatch + '_> {
        Box::new(MemoryBatch::new(self))
    }
}
