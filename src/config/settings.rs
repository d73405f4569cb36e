//! User settings for TradeJournal
//!
//! Stored as `config.json` in the base directory. Every field has a default
//! so older or hand-edited files keep loading.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::paths::JournalPaths;
use crate::backup::DEFAULT_BACKUP_INTERVAL_HOURS;
use crate::batch::RetryPolicy;
use crate::error::JournalError;
use crate::recycle_bin::DEFAULT_RETENTION_DAYS;
use crate::store::file_io::write_atomic;

/// Commit retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries after the first failed attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry; doubles per retry
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_secs: default_base_delay_secs(),
        }
    }
}

/// User settings for TradeJournal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Identity the CLI acts as; nothing user-scoped works without it
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub retry: RetrySettings,

    /// Days a deleted trade stays visible in the recycle bin
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Hours between backups before one is due again
    #[serde(default = "default_backup_interval_hours")]
    pub backup_interval_hours: u32,

    /// When the last backup was taken
    #[serde(default)]
    pub last_backup_at: Option<DateTime<Utc>>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_secs() -> u64 {
    1
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS as u32
}

fn default_backup_interval_hours() -> u32 {
    DEFAULT_BACKUP_INTERVAL_HOURS as u32
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: None,
            retry: RetrySettings::default(),
            retention_days: default_retention_days(),
            backup_interval_hours: default_backup_interval_hours(),
            last_backup_at: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet
    pub fn load_or_create(paths: &JournalPaths) -> Result<Self, JournalError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| JournalError::Io(format!("Failed to read settings file: {}", e)))?;

            serde_json::from_str(&contents)
                .map_err(|e| JournalError::Config(format!("Failed to parse settings file: {}", e)))
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &JournalPaths) -> Result<(), JournalError> {
        paths.ensure_directories()?;
        write_atomic(&paths.settings_file(), self)
            .map_err(|e| JournalError::Config(format!("Failed to save settings: {}", e.message)))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_retries,
            StdDuration::from_secs(self.retry.base_delay_secs),
        )
    }

    pub fn retention_window(&self) -> Duration {
        Duration::days(i64::from(self.retention_days))
    }

    pub fn backup_interval(&self) -> Duration {
        Duration::hours(i64::from(self.backup_interval_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.user_id.is_none());
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.retention_window(), Duration::days(7));
        assert_eq!(settings.backup_interval(), Duration::hours(24));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.user_id = Some("uid-42".into());
        settings.retry.max_retries = 5;
        settings.last_backup_at = Some(Utc::now());
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert_eq!(settings.user_id.as_deref(), Some("u1"));
        assert_eq!(settings.retention_days, 7);
        assert_eq!(settings.retry.max_retries, 3);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&paths),
            Err(JournalError::Config(_))
        ));
    }
}
