//! Path management for TradeJournal
//!
//! ## Path Resolution Order
//!
//! 1. `TRADEJOURNAL_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `tradejournal`
//!    (e.g. `~/.config/tradejournal` on Linux)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::JournalError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "TRADEJOURNAL_DATA_DIR";

/// Manages all paths used by TradeJournal
#[derive(Debug, Clone)]
pub struct JournalPaths {
    base_dir: PathBuf,
}

impl JournalPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, JournalError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "tradejournal")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| JournalError::Config("Could not determine a home directory".into()))?,
        };

        Ok(Self { base_dir })
    }

    /// Paths under an explicit base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// The JSON document store
    pub fn store_file(&self) -> PathBuf {
        self.data_dir().join("store.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), JournalError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| JournalError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| JournalError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether settings have ever been saved here
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.store_file(), temp_dir.path().join("data").join("store.json"));
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var(DATA_DIR_ENV, temp_dir.path());

        let paths = JournalPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        std::env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = JournalPaths::with_base_dir(temp_dir.path().join("nested"));

        assert!(!paths.is_initialized());
        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().exists());
    }
}
