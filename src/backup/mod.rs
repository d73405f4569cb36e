//! Backup system for TradeJournal
//!
//! - `BackupManager`: takes snapshots, lists them and decides when the next
//!   one is due
//! - `RestoreManager`: writes a snapshot back as new documents
//!
//! Snapshots are documents under `users/{userId}/backups/{backupId}` holding
//! the user's accounts, trades (each with its `accountId`) and setups.

mod manager;
mod restore;

pub use manager::{get_backup, BackupManager, DEFAULT_BACKUP_INTERVAL_HOURS};
pub use restore::{RestoreManager, RestoreResult};
