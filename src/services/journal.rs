//! Journal entry service
//!
//! One free-text entry per trading day, optionally linked to trades.
//! Entries are hard-deleted like notes.

use super::{changed_fields, load, load_all, logged};
use crate::batch::{BatchCoordinator, Operation};
use crate::error::{JournalError, JournalResult};
use crate::models::{JournalEntry, JournalEntryId, JournalEntryUpdate};
use crate::session::Session;
use crate::store::{CollectionKey, DocKey, DocumentStore};

pub struct JournalEntryService<'a> {
    store: &'a dyn DocumentStore,
    session: &'a Session,
}

impl<'a> JournalEntryService<'a> {
    pub fn new(store: &'a dyn DocumentStore, session: &'a Session) -> Self {
        Self { store, session }
    }

    pub fn create(
        &self,
        batch: &mut BatchCoordinator<'_>,
        entry: JournalEntry,
    ) -> JournalResult<JournalEntry> {
        let result = self.stage_create(batch, entry);
        logged(batch, "createJournalEntry", result)
    }

    fn stage_create(
        &self,
        batch: &mut BatchCoordinator<'_>,
        entry: JournalEntry,
    ) -> JournalResult<JournalEntry> {
        let user = self.session.require_user()?;
        if entry.content.trim().is_empty() {
            return Err(JournalError::Validation(
                "Journal entry content cannot be empty".into(),
            ));
        }
        batch.stage(Operation::set(DocKey::JournalEntry(user, entry.id), &entry)?)?;
        Ok(entry)
    }

    pub fn update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        id: JournalEntryId,
        update: &JournalEntryUpdate,
    ) -> JournalResult<JournalEntry> {
        let result = self.stage_update(batch, id, update);
        logged(batch, "updateJournalEntry", result)
    }

    fn stage_update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        id: JournalEntryId,
        update: &JournalEntryUpdate,
    ) -> JournalResult<JournalEntry> {
        let user = self.session.require_user()?;
        let mut entry = self.get(id)?;
        entry.apply(update);
        let fields = changed_fields(&entry, update, &[])?;
        batch.stage(Operation::update(DocKey::JournalEntry(user, id), fields))?;
        Ok(entry)
    }

    pub fn delete(&self, batch: &mut BatchCoordinator<'_>, id: JournalEntryId) -> JournalResult<()> {
        let result = self.stage_delete(batch, id);
        logged(batch, "deleteJournalEntry", result)
    }

    fn stage_delete(&self, batch: &mut BatchCoordinator<'_>, id: JournalEntryId) -> JournalResult<()> {
        let user = self.session.require_user()?;
        self.get(id)?;
        batch.stage(Operation::delete(DocKey::JournalEntry(user, id)))
    }

    pub fn get(&self, id: JournalEntryId) -> JournalResult<JournalEntry> {
        let user = self.session.require_user()?;
        load(self.store, DocKey::JournalEntry(user, id))?
            .ok_or_else(|| JournalError::journal_entry_not_found(id.to_string()))
    }

    /// Entries, latest trading day first
    pub fn list(&self) -> JournalResult<Vec<JournalEntry>> {
        let user = self.session.require_user()?;
        let mut entries: Vec<JournalEntry> = load_all(self.store, CollectionKey::JournalEntries(user))?;
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(entries)
    }
}
