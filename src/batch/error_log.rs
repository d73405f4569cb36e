//! Coordinator error log
//!
//! Structured record of failures seen while staging or committing a batch.
//! Cleared whenever a new batch is started.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp_now;

/// One recorded failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    /// Operation that failed (e.g., "softDeleteTrade" or "commit")
    pub operation: String,
    /// Rendered error
    pub error: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
    entries: Vec<ErrorLogEntry>,
}

impl ErrorLog {
    pub fn record(&mut self, operation: impl Into<String>, error: &dyn fmt::Display) {
        self.entries.push(ErrorLogEntry {
            operation: operation.into(),
            error: error.to_string(),
            timestamp: timestamp_now(),
        });
    }

    pub fn entries(&self) -> &[ErrorLogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ErrorLogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_clear() {
        let mut log = ErrorLog::default();
        log.record("createTrade", &"unauthenticated");
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().unwrap().operation, "createTrade");
        assert_eq!(log.last().unwrap().error, "unauthenticated");

        log.clear();
        assert!(log.is_empty());
    }
}
