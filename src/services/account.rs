//! Account service
//!
//! Creation, soft deletion and lookup of trading accounts. Soft deletion
//! marks the account in place and leaves its trades untouched.

use tracing::debug;

use super::{load, load_all, logged, soft_delete_fields};
use crate::batch::{BatchCoordinator, Operation};
use crate::error::{JournalError, JournalResult};
use crate::models::{timestamp_now, Account, AccountDraft, AccountId};
use crate::session::Session;
use crate::store::{CollectionKey, DocKey, DocumentStore};

/// Service for account management
pub struct AccountService<'a> {
    store: &'a dyn DocumentStore,
    session: &'a Session,
}

impl<'a> AccountService<'a> {
    pub fn new(store: &'a dyn DocumentStore, session: &'a Session) -> Self {
        Self { store, session }
    }

    /// Stage creation of a new account
    pub fn create(&self, batch: &mut BatchCoordinator<'_>, draft: AccountDraft) -> JournalResult<Account> {
        let result = self.stage_create(batch, draft);
        logged(batch, "createAccount", result)
    }

    fn stage_create(&self, batch: &mut BatchCoordinator<'_>, draft: AccountDraft) -> JournalResult<Account> {
        let user = self.session.require_user()?;
        let account = Account::new(draft);
        account
            .validate()
            .map_err(|e| JournalError::Validation(e.to_string()))?;

        batch.stage(Operation::set(DocKey::Account(user, account.id), &account)?)?;
        debug!(account = %account.id, "staged account creation");
        Ok(account)
    }

    /// Stage a soft delete of an account
    pub fn soft_delete(&self, batch: &mut BatchCoordinator<'_>, id: AccountId) -> JournalResult<Account> {
        let result = self.stage_soft_delete(batch, id);
        logged(batch, "softDeleteAccount", result)
    }

    fn stage_soft_delete(&self, batch: &mut BatchCoordinator<'_>, id: AccountId) -> JournalResult<Account> {
        let user = self.session.require_user()?;
        let mut account = self.get(id)?;

        let now = timestamp_now();
        batch.stage(Operation::update(DocKey::Account(user, id), soft_delete_fields(now)))?;

        account.is_deleted = true;
        account.deleted_at = Some(now);
        account.updated_at = now;
        Ok(account)
    }

    /// Get an account by ID, deleted or not
    pub fn get(&self, id: AccountId) -> JournalResult<Account> {
        let user = self.session.require_user()?;
        load(self.store, DocKey::Account(user, id))?
            .ok_or_else(|| JournalError::account_not_found(id.to_string()))
    }

    /// Find an account by name (case-insensitive) or ID
    pub fn find(&self, identifier: &str) -> JournalResult<Option<Account>> {
        let accounts = self.list(true)?;
        if let Some(account) = accounts
            .iter()
            .find(|a| !a.is_deleted && a.name.eq_ignore_ascii_case(identifier))
        {
            return Ok(Some(account.clone()));
        }

        Ok(identifier
            .parse::<AccountId>()
            .ok()
            .and_then(|id| accounts.into_iter().find(|a| a.id == id)))
    }

    /// All accounts ordered by name
    pub fn list(&self, include_deleted: bool) -> JournalResult<Vec<Account>> {
        let user = self.session.require_user()?;
        let mut accounts: Vec<Account> = load_all(self.store, CollectionKey::Accounts(user))?;
        if !include_deleted {
            accounts.retain(|a| !a.is_deleted);
        }
        accounts.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(accounts)
    }
}
