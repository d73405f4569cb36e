//! Document store layer for TradeJournal
//!
//! A generic hierarchical JSON document store with two backends: an
//! in-memory store and a JSON-file store with atomic writes. Paths are built
//! from structured keys only.

pub mod document;
pub mod file;
pub mod file_io;
pub mod memory;
pub mod path;

pub use document::{
    from_document, to_document, Document, DocumentStore, Filter, FilterOp, StoreBatch,
    StoreError, StoreErrorCode,
};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use path::{CollectionKey, CollectionPath, DocKey, DocPath};
