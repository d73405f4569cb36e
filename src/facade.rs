//! Journal facade
//!
//! One method per user-facing action. Each action opens its own batch, lets
//! the services stage their writes, commits with the configured retry policy
//! and turns a failed commit into `JournalError::CommitFailed`. Outcomes are
//! appended to the audit trail when a logger is attached.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger, Outcome};
use crate::backup::{BackupManager, RestoreManager, RestoreResult};
use crate::batch::{thread_sleeper, BatchCoordinator, OperationKind, RetryPolicy, Sleeper};
use crate::error::JournalResult;
use crate::models::{
    timestamp_now, Account, AccountDraft, AccountId, BackupId, BackupRecord, BackupSummary,
    DeletedTrade, DeletedTradeId, JournalEntry, JournalEntryId, JournalEntryUpdate, Note, NoteId,
    NoteUpdate, Setup, SetupId, SetupUpdate, Trade, TradeDraft, TradeId, TradeUpdate,
};
use crate::recycle_bin::{default_retention_window, DeletedTradeListing, RecycleBin};
use crate::services::{AccountService, JournalEntryService, NoteService, SetupService, TradeService};
use crate::session::Session;
use crate::store::{DocKey, DocumentStore};

/// Entry point for every journal action
pub struct Journal<'s> {
    store: &'s dyn DocumentStore,
    session: Session,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    retention: Duration,
    backups: BackupManager,
    audit: Option<AuditLogger>,
}

impl<'s> Journal<'s> {
    pub fn new(store: &'s dyn DocumentStore, session: Session) -> Self {
        Self {
            store,
            session,
            policy: RetryPolicy::default(),
            sleeper: thread_sleeper(),
            retention: default_retention_window(),
            backups: BackupManager::default(),
            audit: None,
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// How far back the recycle bin looks
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_backup_manager(mut self, backups: BackupManager) -> Self {
        self.backups = backups;
        self
    }

    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn store(&self) -> &'s dyn DocumentStore {
        self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self.store, &self.session)
    }

    pub fn trades(&self) -> TradeService<'_> {
        TradeService::new(self.store, &self.session)
    }

    pub fn setups(&self) -> SetupService<'_> {
        SetupService::new(self.store, &self.session)
    }

    pub fn notes(&self) -> NoteService<'_> {
        NoteService::new(self.store, &self.session)
    }

    pub fn journal_entries(&self) -> JournalEntryService<'_> {
        JournalEntryService::new(self.store, &self.session)
    }

    pub fn recycle_bin(&self) -> RecycleBin<'_> {
        RecycleBin::new(self.store, &self.session)
    }

    /// A fresh coordinator using this journal's retry policy
    pub fn coordinator(&self) -> BatchCoordinator<'s> {
        BatchCoordinator::new(self.store, self.policy, Arc::clone(&self.sleeper))
    }

    /// Run `stage` on a new batch and commit everything it staged as one unit
    ///
    /// Several service calls made inside `stage` land or fail together.
    pub fn atomically<T>(
        &self,
        action: &'static str,
        stage: impl FnOnce(&mut BatchCoordinator<'s>) -> JournalResult<T>,
    ) -> JournalResult<T> {
        let mut batch = self.coordinator();
        batch.start();
        let value = stage(&mut batch)?;

        let operations = batch.staged().to_vec();
        match batch.commit() {
            Ok(_) => {
                self.audit(AuditEntry::committed(action, &operations));
                Ok(value)
            }
            Err(err) => {
                self.audit(AuditEntry::failed(action, &operations, &err));
                Err(err.into_journal_error(action))
            }
        }
    }

    fn audit(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(err) = logger.log(&entry) {
                warn!(error = %err, action = %entry.action, "failed to write audit entry");
            }
        }
    }

    // Accounts

    pub fn create_account(&self, draft: AccountDraft) -> JournalResult<Account> {
        self.atomically("createAccount", |batch| self.accounts().create(batch, draft))
    }

    /// Soft delete; the account's trades are left as they are
    pub fn delete_account(&self, id: AccountId) -> JournalResult<Account> {
        self.atomically("deleteAccount", |batch| self.accounts().soft_delete(batch, id))
    }

    pub fn list_accounts(&self, include_deleted: bool) -> JournalResult<Vec<Account>> {
        self.accounts().list(include_deleted)
    }

    pub fn find_account(&self, identifier: &str) -> JournalResult<Option<Account>> {
        self.accounts().find(identifier)
    }

    // Trades

    pub fn create_trade(&self, account_id: AccountId, draft: TradeDraft) -> JournalResult<Trade> {
        self.atomically("createTrade", |batch| {
            self.trades().create(batch, account_id, draft)
        })
    }

    pub fn update_trade(
        &self,
        account_id: AccountId,
        id: TradeId,
        update: &TradeUpdate,
    ) -> JournalResult<Trade> {
        self.atomically("updateTrade", |batch| {
            self.trades().update(batch, account_id, id, update)
        })
    }

    /// Move a trade into the recycle bin
    pub fn delete_trade(&self, account_id: AccountId, id: TradeId) -> JournalResult<DeletedTrade> {
        self.atomically("deleteTrade", |batch| {
            self.trades().soft_delete(batch, account_id, id)
        })
    }

    pub fn get_trade(&self, account_id: AccountId, id: TradeId) -> JournalResult<Trade> {
        self.trades().get(account_id, id)
    }

    pub fn list_trades(&self, account_id: AccountId, include_deleted: bool) -> JournalResult<Vec<Trade>> {
        self.trades().list(account_id, include_deleted)
    }

    // Setups

    pub fn create_setup(&self, setup: Setup) -> JournalResult<Setup> {
        self.atomically("createSetup", |batch| self.setups().create(batch, setup))
    }

    pub fn update_setup(&self, id: SetupId, update: &SetupUpdate) -> JournalResult<Setup> {
        self.atomically("updateSetup", |batch| self.setups().update(batch, id, update))
    }

    pub fn delete_setup(&self, id: SetupId) -> JournalResult<Setup> {
        self.atomically("deleteSetup", |batch| self.setups().soft_delete(batch, id))
    }

    pub fn list_setups(&self, include_deleted: bool) -> JournalResult<Vec<Setup>> {
        self.setups().list(include_deleted)
    }

    // Notes and journal entries

    pub fn create_note(&self, note: Note) -> JournalResult<Note> {
        self.atomically("createNote", |batch| self.notes().create(batch, note))
    }

    pub fn update_note(&self, id: NoteId, update: &NoteUpdate) -> JournalResult<Note> {
        self.atomically("updateNote", |batch| self.notes().update(batch, id, update))
    }

    pub fn delete_note(&self, id: NoteId) -> JournalResult<()> {
        self.atomically("deleteNote", |batch| self.notes().delete(batch, id))
    }

    pub fn list_notes(&self) -> JournalResult<Vec<Note>> {
        self.notes().list()
    }

    pub fn create_journal_entry(&self, entry: JournalEntry) -> JournalResult<JournalEntry> {
        self.atomically("createJournalEntry", |batch| {
            self.journal_entries().create(batch, entry)
        })
    }

    pub fn update_journal_entry(
        &self,
        id: JournalEntryId,
        update: &JournalEntryUpdate,
    ) -> JournalResult<JournalEntry> {
        self.atomically("updateJournalEntry", |batch| {
            self.journal_entries().update(batch, id, update)
        })
    }

    pub fn delete_journal_entry(&self, id: JournalEntryId) -> JournalResult<()> {
        self.atomically("deleteJournalEntry", |batch| {
            self.journal_entries().delete(batch, id)
        })
    }

    pub fn list_journal_entries(&self) -> JournalResult<Vec<JournalEntry>> {
        self.journal_entries().list()
    }

    // Recycle bin

    /// Recycle-bin entries of every account, deleted accounts included
    pub fn list_deleted_trades(&self) -> JournalResult<Vec<DeletedTradeListing>> {
        let accounts = self.accounts().list(true)?;
        let ids: Vec<AccountId> = accounts.iter().map(|a| a.id).collect();
        self.recycle_bin().list_deleted(&ids, &accounts, self.retention)
    }

    pub fn recover_trade(&self, account_id: AccountId, id: DeletedTradeId) -> JournalResult<Trade> {
        self.atomically("recoverTrade", |batch| {
            self.recycle_bin().recover(batch, account_id, id)
        })
    }

    /// Permanently delete a recycle-bin entry, bypassing the batch path
    pub fn purge_trade(&self, account_id: AccountId, id: DeletedTradeId) -> JournalResult<()> {
        let result = self.recycle_bin().purge(account_id, id);
        let path = match self.session.user_id() {
            Some(user) => vec![format!(
                "{} {}",
                OperationKind::Delete,
                DocKey::DeletedTrade(user, account_id, id).path()
            )],
            None => Vec::new(),
        };
        let entry = match &result {
            Ok(()) => AuditEntry::new("purgeTrade", Outcome::Committed, 1, path, None),
            Err(err) => AuditEntry::new("purgeTrade", Outcome::Failed, 1, path, Some(err.to_string())),
        };
        self.audit(entry);
        result
    }

    // Backups

    pub fn create_backup(&mut self) -> JournalResult<BackupRecord> {
        let mut batch = self.coordinator();
        let result = self.backups.create_backup(&mut batch, &self.session);

        let entry = match &result {
            Ok(record) => {
                let path = self
                    .session
                    .user_id()
                    .map(|user| format!("{} {}", OperationKind::Set, DocKey::Backup(user, record.id).path()));
                AuditEntry::new("createBackup", Outcome::Committed, 1, path.into_iter().collect(), None)
            }
            Err(err) => AuditEntry::new("createBackup", Outcome::Failed, 1, Vec::new(), Some(err.to_string())),
        };
        self.audit(entry);
        result
    }

    pub fn get_backups(&self) -> JournalResult<Vec<BackupSummary>> {
        self.backups.list_backups(self.store, &self.session)
    }

    pub fn restore_from_backup(&self, id: BackupId) -> JournalResult<RestoreResult> {
        let mut batch = self.coordinator();
        let result = RestoreManager::new(&self.session).restore(&mut batch, id);

        let entry = match &result {
            Ok(restored) => AuditEntry::new(
                "restoreFromBackup",
                Outcome::Committed,
                restored.accounts + restored.trades + restored.setups,
                Vec::new(),
                None,
            ),
            Err(err) => AuditEntry::new(
                "restoreFromBackup",
                Outcome::Failed,
                0,
                Vec::new(),
                Some(err.to_string()),
            ),
        };
        self.audit(entry);
        result
    }

    /// Whether a backup is due now
    pub fn should_create_backup(&self) -> bool {
        self.backups.should_create_backup(timestamp_now())
    }

    pub fn last_backup_at(&self) -> Option<DateTime<Utc>> {
        self.backups.last_backup_at()
    }
}
