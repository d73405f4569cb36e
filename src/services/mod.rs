//! Service layer for TradeJournal
//!
//! Each service turns one domain action into staged operations on a
//! caller-owned `BatchCoordinator`. Services read the store directly but never
//! commit: the caller decides which actions are committed together. Failures
//! are recorded in the coordinator's error log and returned unchanged.

pub mod account;
pub mod journal;
pub mod note;
pub mod setup;
pub mod trade;

pub use account::AccountService;
pub use journal::JournalEntryService;
pub use note::NoteService;
pub use setup::SetupService;
pub use trade::TradeService;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::batch::BatchCoordinator;
use crate::error::JournalResult;
use crate::store::{from_document, to_document, CollectionKey, DocKey, Document, DocumentStore};

/// Record a failed action in the coordinator's error log, then hand the result back
pub(crate) fn logged<T>(
    batch: &mut BatchCoordinator<'_>,
    operation: &str,
    result: JournalResult<T>,
) -> JournalResult<T> {
    if let Err(err) = &result {
        batch.record_error(operation, err);
    }
    result
}

/// Read and decode one document
pub(crate) fn load<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: DocKey<'_>,
) -> JournalResult<Option<T>> {
    match store.get(&key.path())? {
        Some(doc) => Ok(Some(from_document(doc)?)),
        None => Ok(None),
    }
}

/// Read and decode every document of a collection
pub(crate) fn load_all<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    key: CollectionKey<'_>,
) -> JournalResult<Vec<T>> {
    store
        .list(&key.path())?
        .into_iter()
        .map(|(_, doc)| from_document(doc).map_err(Into::into))
        .collect()
}

/// Epoch-millisecond form of a timestamp, as stored in documents
pub(crate) fn millis(at: DateTime<Utc>) -> Value {
    Value::from(at.timestamp_millis())
}

/// Fields touched by `update`, taken from the already updated model, plus
/// `updatedAt` and any `derived` fields the update recomputed
pub(crate) fn changed_fields<M: Serialize, U: Serialize>(
    updated: &M,
    update: &U,
    derived: &[&str],
) -> JournalResult<Document> {
    let full = to_document(updated)?;
    let touched = to_document(update)?;
    Ok(touched
        .keys()
        .map(String::as_str)
        .chain(derived.iter().copied())
        .chain(std::iter::once("updatedAt"))
        .filter_map(|key| full.get(key).map(|value| (key.to_string(), value.clone())))
        .collect())
}

/// Fields marking a document soft-deleted in place
pub(crate) fn soft_delete_fields(at: DateTime<Utc>) -> Document {
    let mut fields = Document::new();
    fields.insert("isDeleted".into(), Value::Bool(true));
    fields.insert("deletedAt".into(), millis(at));
    fields.insert("updatedAt".into(), millis(at));
    fields
}
