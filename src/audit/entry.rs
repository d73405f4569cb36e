//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::Operation;
use crate::models::timestamp_now;

/// How an audited action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Committed,
    Failed,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Committed => write!(f, "COMMITTED"),
            Outcome::Failed => write!(f, "FAILED"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the action finished (UTC)
    pub timestamp: DateTime<Utc>,

    /// Journal action, e.g. "deleteTrade"
    pub action: String,

    pub outcome: Outcome,

    /// Number of writes in the batch
    pub writes: usize,

    /// "KIND path" of every write, in commit order
    #[serde(default)]
    pub paths: Vec<String>,

    /// Failure message for failed actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEntry {
    /// Entry for a batch that committed
    pub fn committed(action: impl Into<String>, operations: &[Operation]) -> Self {
        Self::new(action, Outcome::Committed, operations.len(), describe(operations), None)
    }

    /// Entry for a batch that did not commit
    pub fn failed(action: impl Into<String>, operations: &[Operation], error: impl ToString) -> Self {
        Self::new(
            action,
            Outcome::Failed,
            operations.len(),
            describe(operations),
            Some(error.to_string()),
        )
    }

    pub fn new(
        action: impl Into<String>,
        outcome: Outcome,
        writes: usize,
        paths: Vec<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            timestamp: timestamp_now(),
            action: action.into(),
            outcome,
            writes,
            paths,
            error,
        }
    }

    /// One-line rendering for terminal output
    pub fn format_human_readable(&self) -> String {
        let mut line = format!(
            "{} {} {} ({} write{})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.outcome,
            self.action,
            self.writes,
            if self.writes == 1 { "" } else { "s" }
        );
        if let Some(error) = &self.error {
            line.push_str(": ");
            line.push_str(error);
        }
        line
    }
}

fn describe(operations: &[Operation]) -> Vec<String> {
    operations.iter().map(ToString::to_string).collect()
}
