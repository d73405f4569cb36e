//! Backup restoration for TradeJournal
//!
//! Restoring adds documents and never touches existing ones: every account,
//! trade and setup in the snapshot is written at a freshly generated ID with
//! a `restoredAt` timestamp. Trades and their setup references follow the new
//! IDs of the accounts and setups restored alongside them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use super::manager::get_backup;
use crate::batch::{BatchCoordinator, Operation};
use crate::error::JournalResult;
use crate::models::{timestamp_now, AccountId, BackupId, BackupRecord, SetupId, TradeId, UserId};
use crate::services::{logged, millis};
use crate::session::Session;
use crate::store::{DocKey, Document};

/// What a restore wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreResult {
    pub backup_id: BackupId,
    /// When the restored snapshot was taken
    pub backup_date: DateTime<Utc>,
    pub restored_at: DateTime<Utc>,
    pub accounts: usize,
    pub trades: usize,
    pub setups: usize,
    /// Trades left out because their account could not be determined
    pub skipped: usize,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Restored {} account(s), {} trade(s), {} setup(s)",
            self.accounts, self.trades, self.setups
        );
        if self.skipped > 0 {
            summary.push_str(&format!(", skipped {} trade(s)", self.skipped));
        }
        summary
    }
}

/// Restores snapshots taken by the backup manager
pub struct RestoreManager<'a> {
    session: &'a Session,
}

impl<'a> RestoreManager<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Restore a backup as new documents, committed as one unit
    ///
    /// Opens a fresh batch on `batch`, discarding anything staged before.
    pub fn restore(&self, batch: &mut BatchCoordinator<'_>, id: BackupId) -> JournalResult<RestoreResult> {
        batch.start();
        let staged = self.stage_restore(batch, id);
        let result = logged(batch, "restoreFromBackup", staged)?;

        batch
            .commit()
            .map_err(|e| e.into_journal_error("restoreFromBackup"))?;

        info!(backup = %id, "{}", result.summary());
        Ok(result)
    }

    fn stage_restore(&self, batch: &mut BatchCoordinator<'_>, id: BackupId) -> JournalResult<RestoreResult> {
        let user = self.session.require_user()?;
        let record = get_backup(batch.store(), user, id)?;
        let restored_at = timestamp_now();
        let plan = plan_restore(user, &record, restored_at);
        batch.stage_all(plan.operations)?;

        Ok(RestoreResult {
            backup_id: record.id,
            backup_date: record.timestamp,
            restored_at,
            accounts: record.accounts.len(),
            trades: record.trades.len() - plan.skipped,
            setups: record.setups.len(),
            skipped: plan.skipped,
        })
    }
}

struct RestorePlan {
    operations: Vec<Operation>,
    skipped: usize,
}

/// Build the writes for a restore without touching the store
fn plan_restore(user: &UserId, record: &BackupRecord, restored_at: DateTime<Utc>) -> RestorePlan {
    let mut operations = Vec::new();
    let mut account_ids: HashMap<String, AccountId> = HashMap::new();
    let mut setup_ids: HashMap<String, SetupId> = HashMap::new();

    for doc in &record.accounts {
        let new_id = AccountId::new();
        if let Some(old) = string_field(doc, "id") {
            account_ids.insert(old, new_id);
        }
        let doc = restored(doc, new_id.to_string(), restored_at);
        operations.push(Operation::set_document(DocKey::Account(user, new_id).path(), doc));
    }

    for doc in &record.setups {
        let new_id = SetupId::new();
        if let Some(old) = string_field(doc, "id") {
            setup_ids.insert(old, new_id);
        }
        let doc = restored(doc, new_id.to_string(), restored_at);
        operations.push(Operation::set_document(DocKey::Setup(user, new_id).path(), doc));
    }

    let mut skipped = 0;
    for doc in &record.trades {
        let recorded = string_field(doc, "accountId");
        let account_id = match recorded.as_deref() {
            Some(old) => account_ids
                .get(old)
                .copied()
                .or_else(|| old.parse::<AccountId>().ok()),
            None => None,
        };
        let Some(account_id) = account_id else {
            warn!(trade = ?doc.get("id"), "trade without a usable accountId, not restored");
            skipped += 1;
            continue;
        };

        let new_id = TradeId::new();
        let mut doc = restored(doc, new_id.to_string(), restored_at);
        doc.insert("accountId".into(), Value::from(account_id.to_string()));
        if let Some(new_setup) = string_field(&doc, "setupId").and_then(|old| setup_ids.get(&old).copied()) {
            doc.insert("setupId".into(), Value::from(new_setup.to_string()));
        }
        operations.push(Operation::set_document(
            DocKey::Trade(user, account_id, new_id).path(),
            doc,
        ));
    }

    RestorePlan {
        operations,
        skipped,
    }
}

fn string_field(doc: &Document, field: &str) -> Option<String> {
    doc.get(field).and_then(Value::as_str).map(str::to_string)
}

fn restored(doc: &Document, new_id: String, restored_at: DateTime<Utc>) -> Document {
    let mut doc = doc.clone();
    doc.insert("id".into(), Value::from(new_id));
    doc.insert("restoredAt".into(), millis(restored_at));
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupManager;
    use crate::error::JournalError;
    use crate::models::{AccountDraft, Direction, Setup, Trade, TradeDraft};
    use crate::services::testing::coordinator;
    use crate::services::{AccountService, SetupService, TradeService};
    use crate::store::{CollectionKey, DocumentStore, MemoryStore};

    fn without_ids(mut doc: Document) -> Document {
        for field in ["id", "restoredAt", "accountId", "setupId"] {
            doc.remove(field);
        }
        doc
    }

    fn all_trade_docs(store: &MemoryStore, user: &UserId) -> Vec<Document> {
        let mut docs = Vec::new();
        for (path, _) in store.list(&CollectionKey::Accounts(user).path()).unwrap() {
            let account: AccountId = path.id().parse().unwrap();
            for (_, doc) in store.list(&CollectionKey::Trades(user, account).path()).unwrap() {
                docs.push(doc);
            }
        }
        docs
    }

    #[test]
    fn test_backup_restore_round_trip() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let user = UserId::new("u1");
        let accounts = AccountService::new(&store, &session);
        let trades = TradeService::new(&store, &session);
        let setups = SetupService::new(&store, &session);
        let mut batch = coordinator(&store);

        batch.start();
        let a1 = accounts.create(&mut batch, AccountDraft::named("A1")).unwrap();
        let a2 = accounts.create(&mut batch, AccountDraft::named("A2")).unwrap();
        let setup = setups.create(&mut batch, Setup::new("Breakout", "")).unwrap();
        let mut draft = TradeDraft::new("EURUSD", Direction::Long, 1.1, 1000.0);
        draft.setup_id = Some(setup.id);
        let t1 = trades.create(&mut batch, a1.id, draft).unwrap();
        let t2 = trades
            .create(&mut batch, a2.id, TradeDraft::new("GBPUSD", Direction::Short, 1.3, 500.0))
            .unwrap();
        batch.commit().unwrap();

        let originals_before = store.documents().unwrap();
        let record = BackupManager::default().create_backup(&mut batch, &session).unwrap();

        let result = RestoreManager::new(&session).restore(&mut batch, record.id).unwrap();
        assert_eq!(result.accounts, 2);
        assert_eq!(result.trades, 2);
        assert_eq!(result.setups, 1);
        assert_eq!(result.skipped, 0);

        // Originals untouched
        for (path, doc) in &originals_before {
            assert_eq!(store.get(&crate::store::DocPath::from_raw(path.clone())).unwrap().as_ref(), Some(doc));
        }

        let all_accounts = accounts.list(true).unwrap();
        assert_eq!(all_accounts.len(), 4);
        let restored: Vec<_> = all_accounts.iter().filter(|a| a.restored_at.is_some()).collect();
        assert_eq!(restored.len(), 2);
        for account in &restored {
            assert!(account.id != a1.id && account.id != a2.id);
        }

        let trade_docs = all_trade_docs(&store, &user);
        assert_eq!(trade_docs.len(), 4);
        for original in [&t1, &t2] {
            let original_doc = without_ids(crate::store::to_document(original).unwrap());
            let copies: Vec<_> = trade_docs
                .iter()
                .filter(|d| d.get("restoredAt").map_or(false, |v| !v.is_null()))
                .filter(|d| without_ids((*d).clone()) == original_doc)
                .collect();
            assert_eq!(copies.len(), 1, "one restored copy of {}", original.id);
        }

        // Restored trades live under restored accounts and point at the restored setup
        for account in &restored {
            let listed: Vec<Trade> = trades.list(account.id, true).unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].details.account_id, account.id);
            assert!(listed[0].details.restored_at.is_some());
            if listed[0].details.symbol == "EURUSD" {
                let restored_setup = listed[0].details.setup_id.unwrap();
                assert_ne!(restored_setup, setup.id);
                assert!(setups.get(restored_setup).unwrap().restored_at.is_some());
            }
        }
    }

    #[test]
    fn test_restore_unknown_backup() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let mut batch = coordinator(&store);

        let err = RestoreManager::new(&session)
            .restore(&mut batch, BackupId::new())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(store.is_empty());
    }

    #[test]
    fn test_restore_keeps_account_of_orphan_trade() {
        let user = UserId::new("u1");
        let kept = AccountId::new();
        let mut orphan = Document::new();
        orphan.insert("id".into(), Value::from(TradeId::new().to_string()));
        orphan.insert("accountId".into(), Value::from(kept.to_string()));
        let mut broken = Document::new();
        broken.insert("symbol".into(), Value::from("EURUSD"));

        let record = BackupRecord {
            id: BackupId::new(),
            timestamp: timestamp_now(),
            user_id: user.clone(),
            accounts: Vec::new(),
            trades: vec![orphan, broken],
            setups: Vec::new(),
        };
        let plan = plan_restore(&user, &record, timestamp_now());

        assert_eq!(plan.skipped, 1);
        assert_eq!(plan.operations.len(), 1);
        let path = plan.operations[0].path().as_str().to_string();
        assert!(path.starts_with(&format!("users/u1/accounts/{}/trades/", kept)));
    }

    #[test]
    fn test_restore_requires_user() {
        let store = MemoryStore::new();
        let session = Session::anonymous();
        let mut batch = coordinator(&store);

        let err = RestoreManager::new(&session)
            .restore(&mut batch, BackupId::new())
            .unwrap_err();
        assert!(matches!(err, JournalError::Unauthenticated));
    }
}
