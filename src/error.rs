//! Custom error types for TradeJournal
//!
//! This module defines the error hierarchy for the library using thiserror.
//! Store failures are classified into transient and permanent variants so
//! callers can tell retryable conditions apart without inspecting codes.

use thiserror::Error;

use crate::store::StoreError;

/// The main error type for TradeJournal operations
#[derive(Error, Debug)]
pub enum JournalError {
    /// No user identity is available for a user-scoped operation
    #[error("Not authenticated: a user identity is required")]
    Unauthenticated,

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A write was staged while no batch was open
    #[error("No open batch: call start() before staging writes")]
    NoOpenBatch,

    /// Retryable store failure
    #[error("Transient store error: {0}")]
    TransientStore(StoreError),

    /// Non-retryable store failure
    #[error("Store error: {0}")]
    PermanentStore(StoreError),

    /// A commit returned failure after its retry budget was spent
    #[error("{operation} failed after {attempts} attempt(s): {cause}")]
    CommitFailed {
        operation: &'static str,
        attempts: u32,
        cause: String,
    },

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Local persistence errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl JournalError {
    /// Classify a store failure as transient or permanent
    pub fn from_store(err: StoreError) -> Self {
        if err.is_transient() {
            Self::TransientStore(err)
        } else {
            Self::PermanentStore(err)
        }
    }

    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for trades
    pub fn trade_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Trade",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for recycle-bin entries
    pub fn deleted_trade_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Deleted trade",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for setups
    pub fn setup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Setup",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for notes
    pub fn note_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Note",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for journal entries
    pub fn journal_entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Journal entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStore(_))
    }
}

impl From<StoreError> for JournalError {
    fn from(err: StoreError) -> Self {
        Self::from_store(err)
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for TradeJournal operations
pub type JournalResult<T> = Result<T, JournalError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreErrorCode;

    #[test]
    fn test_error_display() {
        let err = JournalError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = JournalError::trade_not_found("trd-1234");
        assert_eq!(err.to_string(), "Trade not found: trd-1234");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_error_classification() {
        let transient = JournalError::from_store(StoreError::new(
            StoreErrorCode::Unavailable,
            "backend down",
        ));
        assert!(transient.is_transient());

        let permanent = JournalError::from_store(StoreError::new(
            StoreErrorCode::PermissionDenied,
            "rules rejected write",
        ));
        assert!(matches!(permanent, JournalError::PermanentStore(_)));
        assert!(!permanent.is_transient());
    }

    #[test]
    fn test_commit_failed_display() {
        let err = JournalError::CommitFailed {
            operation: "createTrade",
            attempts: 4,
            cause: "unavailable: backend down".into(),
        };
        assert_eq!(
            err.to_string(),
            "createTrade failed after 4 attempt(s): unavailable: backend down"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let journal_err: JournalError = io_err.into();
        assert!(matches!(journal_err, JournalError::Io(_)));
    }
}
