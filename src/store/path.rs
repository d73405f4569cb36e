//! Structured document keys
//!
//! Every document location is described by a `DocKey` (or `CollectionKey` for
//! listings) and turned into a path by a single function, so no caller ever
//! formats a path string by hand.
//!
//! ```text
//! users/{userId}
//! users/{userId}/accounts/{accountId}
//! users/{userId}/accounts/{accountId}/trades/{tradeId}
//! users/{userId}/accounts/{accountId}/deletedTrades/{deletedTradeId}
//! users/{userId}/setups/{setupId}
//! users/{userId}/notes/{noteId}
//! users/{userId}/journalEntries/{entryId}
//! users/{userId}/backups/{backupId}
//! ```

use std::fmt;

use crate::models::{
    AccountId, BackupId, DeletedTradeId, JournalEntryId, NoteId, SetupId, TradeId, UserId,
};

const USERS: &str = "users";
const ACCOUNTS: &str = "accounts";
const TRADES: &str = "trades";
const DELETED_TRADES: &str = "deletedTrades";
const SETUPS: &str = "setups";
const NOTES: &str = "notes";
const JOURNAL_ENTRIES: &str = "journalEntries";
const BACKUPS: &str = "backups";

/// Resolved path of a single document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath(String);

impl DocPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment (the document ID)
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Rebuild a path previously produced by `as_str` (used when loading a store)
    pub(crate) fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolved path of a collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the document with `id` inside this collection
    pub fn doc(&self, id: &str) -> DocPath {
        DocPath(format!("{}/{}", self.0, id))
    }

    /// Whether `path` is a direct child of this collection
    pub fn contains(&self, path: &str) -> bool {
        path.strip_prefix(self.0.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .map_or(false, |id| !id.is_empty() && !id.contains('/'))
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of one document
#[derive(Debug, Clone, Copy)]
pub enum DocKey<'a> {
    User(&'a UserId),
    Account(&'a UserId, AccountId),
    Trade(&'a UserId, AccountId, TradeId),
    DeletedTrade(&'a UserId, AccountId, DeletedTradeId),
    Setup(&'a UserId, SetupId),
    Note(&'a UserId, NoteId),
    JournalEntry(&'a UserId, JournalEntryId),
    Backup(&'a UserId, BackupId),
}

/// Location of one collection
#[derive(Debug, Clone, Copy)]
pub enum CollectionKey<'a> {
    Accounts(&'a UserId),
    Trades(&'a UserId, AccountId),
    DeletedTrades(&'a UserId, AccountId),
    Setups(&'a UserId),
    Notes(&'a UserId),
    JournalEntries(&'a UserId),
    Backups(&'a UserId),
}

fn user_root(user: &UserId) -> String {
    format!("{}/{}", USERS, user.as_str())
}

impl CollectionKey<'_> {
    pub fn path(&self) -> CollectionPath {
        let raw = match *self {
            Self::Accounts(user) => format!("{}/{}", user_root(user), ACCOUNTS),
            Self::Trades(user, account) => {
                format!("{}/{}/{}/{}", user_root(user), ACCOUNTS, account, TRADES)
            }
            Self::DeletedTrades(user, account) => {
                format!("{}/{}/{}/{}", user_root(user), ACCOUNTS, account, DELETED_TRADES)
            }
            Self::Setups(user) => format!("{}/{}", user_root(user), SETUPS),
            Self::Notes(user) => format!("{}/{}", user_root(user), NOTES),
            Self::JournalEntries(user) => format!("{}/{}", user_root(user), JOURNAL_ENTRIES),
            Self::Backups(user) => format!("{}/{}", user_root(user), BACKUPS),
        };
        CollectionPath(raw)
    }
}

impl DocKey<'_> {
    pub fn path(&self) -> DocPath {
        match *self {
            Self::User(user) => DocPath(user_root(user)),
            Self::Account(user, id) => CollectionKey::Accounts(user).path().doc(&id.to_string()),
            Self::Trade(user, account, id) => CollectionKey::Trades(user, account)
                .path()
                .doc(&id.to_string()),
            Self::DeletedTrade(user, account, id) => CollectionKey::DeletedTrades(user, account)
                .path()
                .doc(&id.to_string()),
            Self::Setup(user, id) => CollectionKey::Setups(user).path().doc(&id.to_string()),
            Self::Note(user, id) => CollectionKey::Notes(user).path().doc(&id.to_string()),
            Self::JournalEntry(user, id) => CollectionKey::JournalEntries(user)
                .path()
                .doc(&id.to_string()),
            Self::Backup(user, id) => CollectionKey::Backups(user).path().doc(&id.to_string()),
        }
    }
}
