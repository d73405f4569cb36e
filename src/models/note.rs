//! Free-form notes
//!
//! Notes are plain user documents; they are hard-deleted, not recycled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::NoteId;
use super::timestamp_now;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = timestamp_now();
        Self {
            id: NoteId::new(),
            title: title.into().trim().to_string(),
            content: content.into(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: &NoteUpdate) {
        if let Some(title) = &update.title {
            self.title = title.trim().to_string();
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        if let Some(tags) = &update.tags {
            self.tags = tags.clone();
        }
        self.updated_at = timestamp_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_keeps_untouched_fields() {
        let mut note = Note::new("Weekly review", "Overtraded on Monday");
        note.apply(&NoteUpdate {
            tags: Some(vec!["review".into()]),
            ..NoteUpdate::default()
        });
        assert_eq!(note.title, "Weekly review");
        assert_eq!(note.tags, vec!["review".to_string()]);
    }
}
