//! Backup snapshot model
//!
//! A snapshot stores accounts, trades and setups as raw documents so every
//! field survives a restore, including ones this version does not model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BackupId, UserId};
use crate::store::Document;

/// Point-in-time copy of a user's accounts, trades and setups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupRecord {
    pub id: BackupId,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    pub user_id: UserId,

    #[serde(default)]
    pub accounts: Vec<Document>,

    /// Every trade carries its owning `accountId`
    #[serde(default)]
    pub trades: Vec<Document>,

    #[serde(default)]
    pub setups: Vec<Document>,
}

impl BackupRecord {
    pub fn summary(&self) -> BackupSummary {
        BackupSummary {
            id: self.id,
            timestamp: self.timestamp,
            accounts: self.accounts.len(),
            trades: self.trades.len(),
            setups: self.setups.len(),
        }
    }
}

/// Listing view of a backup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupSummary {
    pub id: BackupId,
    pub timestamp: DateTime<Utc>,
    pub accounts: usize,
    pub trades: usize,
    pub setups: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timestamp_now;
    use serde_json::json;

    #[test]
    fn test_summary_counts() {
        let record = BackupRecord {
            id: BackupId::new(),
            timestamp: timestamp_now(),
            user_id: UserId::new("u1"),
            accounts: vec![json!({"name": "Demo"}).as_object().cloned().unwrap()],
            trades: Vec::new(),
            setups: Vec::new(),
        };
        let summary = record.summary();
        assert_eq!(summary.accounts, 1);
        assert_eq!(summary.trades, 0);
        assert_eq!(summary.id, record.id);
    }

    #[test]
    fn test_document_field_names() {
        let record = BackupRecord {
            id: BackupId::new(),
            timestamp: timestamp_now(),
            user_id: UserId::new("u1"),
            accounts: Vec::new(),
            trades: Vec::new(),
            setups: Vec::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["userId"], "u1");
        assert!(value["timestamp"].is_i64());
    }
}
