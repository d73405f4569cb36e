//! Staged write operations
//!
//! An `Operation` is a deferred write against one document path. It is an
//! immutable value: the coordinator replays the same list of operations into
//! a fresh store batch on every commit attempt.

use std::fmt;

use serde::Serialize;

use crate::error::JournalResult;
use crate::store::{to_document, Document, DocKey, DocPath, StoreBatch};

/// Kind of write an operation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Set,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "SET"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// A deferred write against one document
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create or overwrite the whole document
    Set { path: DocPath, data: Document },
    /// Merge fields into an existing document
    Update { path: DocPath, fields: Document },
    /// Remove the document
    Delete { path: DocPath },
}

impl Operation {
    /// Stage a full write of `model` at `key`
    pub fn set<T: Serialize>(key: DocKey<'_>, model: &T) -> JournalResult<Self> {
        Ok(Self::Set {
            path: key.path(),
            data: to_document(model)?,
        })
    }

    /// Stage a raw document write at an already resolved path
    pub fn set_document(path: DocPath, data: Document) -> Self {
        Self::Set { path, data }
    }

    /// Stage a partial update of the document at `key`
    pub fn update(key: DocKey<'_>, fields: Document) -> Self {
        Self::Update {
            path: key.path(),
            fields,
        }
    }

    /// Stage removal of the document at `key`
    pub fn delete(key: DocKey<'_>) -> Self {
        Self::Delete { path: key.path() }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Set { .. } => OperationKind::Set,
            Self::Update { .. } => OperationKind::Update,
            Self::Delete { .. } => OperationKind::Delete,
        }
    }

    pub fn path(&self) -> &DocPath {
        match self {
            Self::Set { path, .. } | Self::Update { path, .. } | Self::Delete { path } => path,
        }
    }

    /// Payload carried by the write, if any
    pub fn payload(&self) -> Option<&Document> {
        match self {
            Self::Set { data, .. } => Some(data),
            Self::Update { fields, .. } => Some(fields),
            Self::Delete { .. } => None,
        }
    }

    /// Replay this operation into a store batch
    pub(crate) fn apply_to(&self, batch: &mut dyn StoreBatch) {
        match self {
            Self::Set { path, data } => batch.set(path.clone(), data.clone()),
            Self::Update { path, fields } => batch.update(path.clone(), fields.clone()),
            Self::Delete { path } => batch.delete(path.clone()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.path())
    }
}
