//! Configuration module for TradeJournal
//!
//! - Data directory resolution
//! - Persisted user settings (identity, retry policy, retention, backups)

pub mod paths;
pub mod settings;

pub use paths::JournalPaths;
pub use settings::{RetrySettings, Settings};
