//! Core data models for TradeJournal
//!
//! Accounts, trades (live and recycled), setups, notes, journal entries and
//! backup snapshots.
//! Every model serializes to a camelCase JSON document; timestamps are stored
//! as epoch milliseconds.

pub mod account;
pub mod backup;
pub mod ids;
pub mod journal;
pub mod note;
pub mod setup;
pub mod trade;

use chrono::{DateTime, Duration, Utc};

pub use account::{Account, AccountDraft};
pub use backup::{BackupRecord, BackupSummary};
pub use ids::{AccountId, BackupId, DeletedTradeId, JournalEntryId, NoteId, SetupId, TradeId, UserId};
pub use journal::{JournalEntry, JournalEntryUpdate};
pub use note::{Note, NoteUpdate};
pub use setup::{Setup, SetupUpdate};
pub use trade::{DeletedTrade, Direction, Trade, TradeDetails, TradeDraft, TradeUpdate};

/// Current time at the millisecond precision documents are stored with
pub fn timestamp_now() -> DateTime<Utc> {
    let now = Utc::now();
    now - Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000_000))
}
