//! Trade service
//!
//! Trades are created and edited in place. Deleting a trade moves it into the
//! owning account's recycle bin: one `Set` of the `DeletedTrade` followed by a
//! `Delete` of the original, staged on the same batch so they commit together.

use tracing::debug;

use super::{changed_fields, load, load_all, logged};
use crate::batch::{BatchCoordinator, Operation};
use crate::error::{JournalError, JournalResult};
use crate::models::{timestamp_now, AccountId, DeletedTrade, Trade, TradeDraft, TradeId, TradeUpdate};
use crate::session::Session;
use crate::store::{CollectionKey, DocKey, DocumentStore};

/// Service for trade management
pub struct TradeService<'a> {
    store: &'a dyn DocumentStore,
    session: &'a Session,
}

impl<'a> TradeService<'a> {
    pub fn new(store: &'a dyn DocumentStore, session: &'a Session) -> Self {
        Self { store, session }
    }

    /// Stage creation of a trade in `account_id`
    pub fn create(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        draft: TradeDraft,
    ) -> JournalResult<Trade> {
        let result = self.stage_create(batch, account_id, draft);
        logged(batch, "createTrade", result)
    }

    fn stage_create(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        draft: TradeDraft,
    ) -> JournalResult<Trade> {
        let user = self.session.require_user()?;
        let trade = Trade::new(account_id, draft);
        trade
            .validate()
            .map_err(|e| JournalError::Validation(e.to_string()))?;

        batch.stage(Operation::set(DocKey::Trade(user, account_id, trade.id), &trade)?)?;
        debug!(trade = %trade.id, account = %account_id, "staged trade creation");
        Ok(trade)
    }

    /// Stage an edit of an existing trade
    pub fn update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        id: TradeId,
        update: &TradeUpdate,
    ) -> JournalResult<Trade> {
        let result = self.stage_update(batch, account_id, id, update);
        logged(batch, "updateTrade", result)
    }

    fn stage_update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        id: TradeId,
        update: &TradeUpdate,
    ) -> JournalResult<Trade> {
        let user = self.session.require_user()?;
        let mut trade = self.get(account_id, id)?;
        let before = trade.details.clone();
        trade.apply(update);
        trade
            .validate()
            .map_err(|e| JournalError::Validation(e.to_string()))?;

        let d = &trade.details;
        let derived: Vec<&str> = [
            ("grossPnL", d.gross_pnl != before.gross_pnl),
            ("netPnL", d.net_pnl != before.net_pnl),
            ("exitTime", d.exit_time != before.exit_time),
        ]
        .into_iter()
        .filter_map(|(field, moved)| moved.then_some(field))
        .collect();
        let fields = changed_fields(&trade, update, &derived)?;
        batch.stage(Operation::update(DocKey::Trade(user, account_id, id), fields))?;
        Ok(trade)
    }

    /// Stage a move of a trade into its account's recycle bin
    pub fn soft_delete(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        id: TradeId,
    ) -> JournalResult<DeletedTrade> {
        let result = self.stage_soft_delete(batch, account_id, id);
        logged(batch, "softDeleteTrade", result)
    }

    fn stage_soft_delete(
        &self,
        batch: &mut BatchCoordinator<'_>,
        account_id: AccountId,
        id: TradeId,
    ) -> JournalResult<DeletedTrade> {
        let user = self.session.require_user()?;
        let trade = self.get(account_id, id)?;
        let deleted = trade.into_deleted(user.clone(), timestamp_now());

        let moved = Operation::set(DocKey::DeletedTrade(user, account_id, deleted.id), &deleted)?;
        batch.stage_all([moved, Operation::delete(DocKey::Trade(user, account_id, id))])?;
        debug!(trade = %id, deleted = %deleted.id, "staged trade soft delete");
        Ok(deleted)
    }

    /// Get a live trade
    pub fn get(&self, account_id: AccountId, id: TradeId) -> JournalResult<Trade> {
        let user = self.session.require_user()?;
        load(self.store, DocKey::Trade(user, account_id, id))?
            .ok_or_else(|| JournalError::trade_not_found(id.to_string()))
    }

    /// Trades of an account, newest entry first
    pub fn list(&self, account_id: AccountId, include_deleted: bool) -> JournalResult<Vec<Trade>> {
        let user = self.session.require_user()?;
        let mut trades: Vec<Trade> = load_all(self.store, CollectionKey::Trades(user, account_id))?;
        if !include_deleted {
            trades.retain(|t| !t.is_deleted);
        }
        trades.sort_by(|a, b| b.details.entry_time.cmp(&a.details.entry_time));
        Ok(trades)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use crate::services::testing::coordinator;
    use crate::store::{MemoryStore, StoreErrorCode};

    fn eurusd() -> TradeDraft {
        let mut draft = TradeDraft::new("EURUSD", Direction::Long, 1.1000, 1000.0);
        draft.net_pnl = Some(50.0);
        draft
    }

    #[test]
    fn test_create_and_get() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = TradeService::new(&store, &session);
        let account = AccountId::new();
        let mut batch = coordinator(&store);

        batch.start();
        let trade = service.create(&mut batch, account, eurusd()).unwrap();
        batch.commit().unwrap();

        let stored = service.get(account, trade.id).unwrap();
        assert_eq!(stored, trade);
        assert!(!stored.is_deleted);
        assert_eq!(service.list(account, false).unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_quantity() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = TradeService::new(&store, &session);
        let mut batch = coordinator(&store);
        batch.start();

        let draft = TradeDraft::new("EURUSD", Direction::Long, 1.1, 0.0);
        let err = service.create(&mut batch, AccountId::new(), draft).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
        assert!(batch.staged().is_empty());
    }

    #[test]
    fn test_update_stages_only_changed_fields() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = TradeService::new(&store, &session);
        let account = AccountId::new();
        let mut batch = coordinator(&store);

        batch.start();
        let trade = service.create(&mut batch, account, eurusd()).unwrap();
        batch.commit().unwrap();

        batch.start();
        let update = TradeUpdate {
            notes: Some("moved stop to breakeven".into()),
            ..TradeUpdate::default()
        };
        service.update(&mut batch, account, trade.id, &update).unwrap();

        let fields = batch.staged()[0].payload().unwrap().clone();
        assert!(fields.contains_key("notes"));
        assert!(fields.contains_key("updatedAt"));
        assert!(!fields.contains_key("netPnL"));
        assert!(!fields.contains_key("grossPnL"));
        assert!(!fields.contains_key("symbol"));

        batch.commit().unwrap();
        let stored = service.get(account, trade.id).unwrap();
        assert_eq!(stored.details.notes, "moved stop to breakeven");
        assert_eq!(stored.details.symbol, "EURUSD");
        assert_eq!(stored.details.net_pnl, 50.0);
    }

    #[test]
    fn test_closing_a_trade_stages_recomputed_pnl() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = TradeService::new(&store, &session);
        let account = AccountId::new();
        let mut batch = coordinator(&store);

        batch.start();
        let trade = service
            .create(&mut batch, account, TradeDraft::new("EURUSD", Direction::Long, 1.1, 1000.0))
            .unwrap();
        batch.commit().unwrap();

        batch.start();
        let update = TradeUpdate {
            exit_price: Some(Some(1.15)),
            fees: Some(2.0),
            ..TradeUpdate::default()
        };
        service.update(&mut batch, account, trade.id, &update).unwrap();
        let fields = batch.staged()[0].payload().unwrap().clone();
        assert!(fields.contains_key("exitPrice"));
        assert!(fields.contains_key("grossPnL"));
        assert!(fields.contains_key("netPnL"));
        batch.commit().unwrap();

        let stored = service.get(account, trade.id).unwrap();
        assert!((stored.details.net_pnl - 48.0).abs() < 1e-9);

        batch.start();
        let reopen = TradeUpdate {
            exit_price: Some(None),
            ..TradeUpdate::default()
        };
        service.update(&mut batch, account, trade.id, &reopen).unwrap();
        batch.commit().unwrap();

        let stored = service.get(account, trade.id).unwrap();
        assert_eq!(stored.details.exit_price, None);
        assert!((stored.details.net_pnl + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_missing_trade() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = TradeService::new(&store, &session);
        let mut batch = coordinator(&store);
        batch.start();

        let err = service
            .update(&mut batch, AccountId::new(), TradeId::new(), &TradeUpdate::default())
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(batch.error_log().last().unwrap().operation, "updateTrade");
    }

    #[test]
    fn test_soft_delete_moves_trade() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let user = session.require_user().unwrap().clone();
        let service = TradeService::new(&store, &session);
        let account = AccountId::new();
        let mut batch = coordinator(&store);

        batch.start();
        let trade = service.create(&mut batch, account, eurusd()).unwrap();
        batch.commit().unwrap();

        batch.start();
        let deleted = service.soft_delete(&mut batch, account, trade.id).unwrap();
        assert_eq!(batch.staged().len(), 2);
        batch.commit().unwrap();

        assert!(service.get(account, trade.id).unwrap_err().is_not_found());
        let bin = store
            .list(&CollectionKey::DeletedTrades(&user, account).path())
            .unwrap();
        assert_eq!(bin.len(), 1);
        assert_eq!(bin[0].1["originalId"], trade.id.to_string());
        assert_eq!(bin[0].1["deletedBy"], "u1");
        assert_eq!(bin[0].1["netPnL"], 50.0);
        assert_eq!(deleted.original_id, trade.id);
    }

    #[test]
    fn test_failed_soft_delete_commit_keeps_trade_live() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let user = session.require_user().unwrap().clone();
        let service = TradeService::new(&store, &session);
        let account = AccountId::new();
        let mut batch = coordinator(&store);

        batch.start();
        let trade = service.create(&mut batch, account, eurusd()).unwrap();
        batch.commit().unwrap();

        store.fail_commits(StoreErrorCode::PermissionDenied, 1);
        batch.start();
        service.soft_delete(&mut batch, account, trade.id).unwrap();
        assert!(batch.commit().is_err());

        assert!(service.get(account, trade.id).is_ok());
        assert!(store
            .list(&CollectionKey::DeletedTrades(&user, account).path())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_soft_delete_missing_trade_stages_nothing() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = TradeService::new(&store, &session);
        let mut batch = coordinator(&store);
        batch.start();

        let err = service
            .soft_delete(&mut batch, AccountId::new(), TradeId::new())
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(batch.staged().is_empty());
    }
}
