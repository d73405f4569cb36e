//! Recycle bin for soft-deleted trades
//!
//! A soft-deleted trade lives in its account's `deletedTrades` collection
//! until it is recovered or purged. The retention window only limits what
//! `list_deleted` shows; nothing is erased automatically.
//!
//! ```text
//! Active --soft delete--> SoftDeleted --recover--> Active (same ID)
//!                         SoftDeleted --purge----> gone
//! ```

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::batch::{BatchCoordinator, Operation};
use crate::error::{JournalError, JournalResult};
use crate::models::{timestamp_now, Account, AccountId, DeletedTrade, DeletedTradeId, Trade};
use crate::services::{load, logged};
use crate::session::Session;
use crate::store::{from_document, CollectionKey, DocKey, DocumentStore, Filter, FilterOp};

/// Days a deleted trade stays visible in the recycle bin
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Shown when a deleted trade's account is not among the known accounts
pub const UNKNOWN_ACCOUNT: &str = "Unknown Account";

pub fn default_retention_window() -> Duration {
    Duration::days(DEFAULT_RETENTION_DAYS)
}

/// A recycle-bin entry with its account's display name attached
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedTradeListing {
    pub account_id: AccountId,
    pub account_name: String,
    pub trade: DeletedTrade,
}

/// Lists, recovers and purges soft-deleted trades
pub struct RecycleBin<'a> {
    store: &'a dyn DocumentStore,
    session: &'a Session,
}

impl<'a> RecycleBin<'a> {
    pub fn new(store: &'a dyn DocumentStore, session: &'a Session) -> Self {
        Self { store, session }
    }

    /// Deleted trades of `account_ids` deleted within `window` of now, newest first
    ///
    /// A failing account is logged and skipped; the others are still listed.
    /// Names come from `accounts`, falling back to "Unknown Account".
    pub fn list_deleted(
        &self,
        account_ids: &[AccountId],
        accounts: &[Account],
        window: Duration,
    ) -> JournalResult<Vec<DeletedTradeListing>> {
        self.list_deleted_at(account_ids, accounts, window, timestamp_now())
    }

    fn list_deleted_at(
        &self,
        account_ids: &[AccountId],
        accounts: &[Account],
        window: Duration,
        now: DateTime<Utc>,
    ) -> JournalResult<Vec<DeletedTradeListing>> {
        let user = self.session.require_user()?;
        let cutoff = now - window;
        let filter = Filter::new("deletedAt", FilterOp::Gte, cutoff.timestamp_millis());

        let mut listings = Vec::new();
        for &account_id in account_ids {
            let collection = CollectionKey::DeletedTrades(user, account_id).path();
            let docs = match self.store.query(&collection, &filter) {
                Ok(docs) => docs,
                Err(err) => {
                    warn!(account = %account_id, error = %err, "failed to list deleted trades");
                    continue;
                }
            };

            let account_name = accounts
                .iter()
                .find(|a| a.id == account_id)
                .map(|a| a.name.clone())
                .unwrap_or_else(|| UNKNOWN_ACCOUNT.to_string());

            for (path, doc) in docs {
                match from_document::<DeletedTrade>(doc) {
                    Ok(trade) => listings.push(DeletedTradeListing {
                        account_id,
                        account_name: account_name.clone(),
                        trade,
                    }),
                    Err(err) => warn!(path = %path, error = %err, "skipping unreadable deleted trade"),
                }
            }
        }

        listings.sort_by(|a, b| b.trade.deleted_at.cmp(&a.trade.deleted_at));
        Ok(listings)
    }

    /// Read one recycle-bin entry
    pub fn get(&self, account_id: AccountId, id: DeletedTradeId) -> JournalResult<DeletedTrade> {
        let user = self.session.require_user()?;
        load(self.store, DocKey::DeletedTrade(user, account_id, id))?
            .ok_or_else(|| JournalError::deleted_trade_not_found(id.to_string()))
    }

    /// Stage recovery of a deleted trade back to its original ID
    ///
    /// Fails with a validation error if a live trade already holds that ID.
    pub fn recover(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        id: DeletedTradeId,
    ) -> JournalResult<Trade> {
        let result = self.stage_recover(batch, account_id, id);
        logged(batch, "recoverTrade", result)
    }

    fn stage_recover(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        id: DeletedTradeId,
    ) -> JournalResult<Trade> {
        let user = self.session.require_user()?;
        let deleted = self.get(account_id, id)?;

        let original = DocKey::Trade(user, account_id, deleted.original_id);
        if self.store.get(&original.path())?.is_some() {
            return Err(JournalError::Validation(format!(
                "A trade already exists at {}",
                deleted.original_id
            )));
        }

        let trade = deleted.recover(timestamp_now());
        let restored = Operation::set(original, &trade)?;
        batch.stage_all([restored, Operation::delete(DocKey::DeletedTrade(user, account_id, id))])?;
        Ok(trade)
    }

    /// Permanently delete a recycle-bin entry
    ///
    /// Goes straight to the store: not batched and not retried.
    pub fn purge(&self, account_id: AccountId, id: DeletedTradeId) -> JournalResult<()> {
        let user = self.session.require_user()?;
        let key = DocKey::DeletedTrade(user, account_id, id);
        if self.store.get(&key.path())?.is_none() {
            return Err(JournalError::deleted_trade_not_found(id.to_string()));
        }
        self.store.delete(&key.path())?;
        info!(deleted = %id, account = %account_id, "purged deleted trade");
        Ok(())
    }
}
