//! Document store abstraction
//!
//! A hierarchical store of JSON documents addressed by `DocPath`. Reads go
//! straight to the store; writes are grouped into a `StoreBatch` which is
//! applied atomically on `commit`.

use std::cmp::Ordering;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::path::{CollectionPath, DocPath};

/// A stored document: a JSON object
pub type Document = serde_json::Map<String, Value>;

/// Failure codes reported by a store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Optimistic precondition did not hold (contention)
    FailedPrecondition,
    /// Backend temporarily unreachable
    Unavailable,
    /// Request ran out of time
    DeadlineExceeded,
    /// Transport-level rejection of the request
    BadRequest,
    /// Target document does not exist
    NotFound,
    /// Access rules rejected the request
    PermissionDenied,
    /// Malformed request
    InvalidArgument,
    /// Anything else
    Internal,
}

impl StoreErrorCode {
    /// Codes that are worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::FailedPrecondition | Self::Unavailable | Self::DeadlineExceeded | Self::BadRequest
        )
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::FailedPrecondition => "failed-precondition",
            Self::Unavailable => "unavailable",
            Self::DeadlineExceeded => "deadline-exceeded",
            Self::BadRequest => "bad-request",
            Self::NotFound => "not-found",
            Self::PermissionDenied => "permission-denied",
            Self::InvalidArgument => "invalid-argument",
            Self::Internal => "internal",
        };
        f.write_str(code)
    }
}

/// Error returned by a store backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        self.code.is_transient()
    }
}

/// Comparison used by a field filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Single-field query predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Check a document against this filter. Documents missing the field, or
    /// holding a value of a different type, never match.
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(actual) = doc.get(&self.field) else {
            return false;
        };
        let Some(ordering) = compare_values(actual, &self.value) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => ordering == Ordering::Equal,
            FilterOp::Gt => ordering == Ordering::Greater,
            FilterOp::Gte => ordering != Ordering::Less,
            FilterOp::Lt => ordering == Ordering::Less,
            FilterOp::Lte => ordering != Ordering::Greater,
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// A group of writes applied atomically on commit
pub trait StoreBatch {
    /// Create or overwrite the document at `path`
    fn set(&mut self, path: DocPath, data: Document);

    /// Merge `fields` into the existing document at `path`
    fn update(&mut self, path: DocPath, fields: Document);

    /// Remove the document at `path` (no-op if absent)
    fn delete(&mut self, path: DocPath);

    /// Apply every write, or none of them
    fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// A hierarchical JSON document store
pub trait DocumentStore {
    /// Read one document
    fn get(&self, path: &DocPath) -> Result<Option<Document>, StoreError>;

    /// Read every direct child document of a collection, ordered by path
    fn list(&self, collection: &CollectionPath) -> Result<Vec<(DocPath, Document)>, StoreError>;

    /// Read the children of a collection that match `filter`
    fn query(
        &self,
        collection: &CollectionPath,
        filter: &Filter,
    ) -> Result<Vec<(DocPath, Document)>, StoreError> {
        Ok(self
            .list(collection)?
            .into_iter()
            .filter(|(_, doc)| filter.matches(doc))
            .collect())
    }

    /// Remove one document immediately, outside any batch
    fn delete(&self, path: &DocPath) -> Result<(), StoreError>;

    /// Open a fresh write batch
    fn begin_batch(&self) -> Box<dyn StoreBatch + '_>;
}

/// Serialize a model into a document. Fails if it does not serialize to an object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Deserialize a model from a document
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(doc))
}
