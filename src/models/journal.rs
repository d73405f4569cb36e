//! Daily journal entries
//!
//! One entry per trading day with free text, an optional mood tag and the
//! trades it talks about. Hard-deleted like notes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{JournalEntryId, TradeId};
use super::timestamp_now;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: JournalEntryId,
    /// Trading day the entry is about
    pub date: NaiveDate,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub trade_ids: Vec<TradeId>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_ids: Option<Vec<TradeId>>,
}

impl JournalEntry {
    pub fn new(date: NaiveDate, content: impl Into<String>) -> Self {
        let now = timestamp_now();
        Self {
            id: JournalEntryId::new(),
            date,
            content: content.into(),
            mood: None,
            trade_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: &JournalEntryUpdate) {
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        if let Some(mood) = &update.mood {
            self.mood = Some(mood.clone());
        }
        if let Some(trade_ids) = &update.trade_ids {
            self.trade_ids = trade_ids.clone();
        }
        self.updated_at = timestamp_now();
    }
}
