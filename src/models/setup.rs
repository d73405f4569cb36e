//! Setup model
//!
//! A named trading setup (playbook) that trades can be tagged with. Setups are
//! soft-deleted in place like accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::SetupId;
use super::timestamp_now;

/// A trading setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub id: SetupId,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Entry/exit rules, one per line item
    #[serde(default)]
    pub rules: Vec<String>,

    #[serde(default)]
    pub is_deleted: bool,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub deleted_at: Option<DateTime<Utc>>,

    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub restored_at: Option<DateTime<Utc>>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a setup
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
}

impl SetupUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.rules.is_none()
    }
}

impl Setup {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = timestamp_now();
        Self {
            id: SetupId::new(),
            name: name.into().trim().to_string(),
            description: description.into(),
            rules: Vec::new(),
            is_deleted: false,
            deleted_at: None,
            restored_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: &SetupUpdate) {
        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(rules) = &update.rules {
            self.rules = rules.clone();
        }
        self.updated_at = timestamp_now();
    }

    /// Validate the setup, returning a message on failure
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Setup name cannot be empty".into());
        }
        if self.name.len() > 100 {
            return Err(format!("Setup name too long ({} chars, max 100)", self.name.len()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_setup() {
        let setup = Setup::new(" Breakout ", "Range break with volume");
        assert_eq!(setup.name, "Breakout");
        assert!(!setup.is_deleted);
        assert!(setup.validate().is_ok());
    }

    #[test]
    fn test_apply_update() {
        let mut setup = Setup::new("Breakout", "");
        setup.apply(&SetupUpdate {
            rules: Some(vec!["Wait for retest".into()]),
            ..SetupUpdate::default()
        });
        assert_eq!(setup.rules, vec!["Wait for retest".to_string()]);
        assert_eq!(setup.name, "Breakout");
    }

    #[test]
    fn test_empty_name_rejected() {
        let setup = Setup::new("   ", "");
        assert!(setup.validate().is_err());
    }
}
