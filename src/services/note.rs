//! Note service
//!
//! Notes are free-form and hard-deleted.

use super::{changed_fields, load, load_all, logged};
use crate::batch::{BatchCoordinator, Operation};
use crate::error::{JournalError, JournalResult};
use crate::models::{Note, NoteId, NoteUpdate};
use crate::session::Session;
use crate::store::{CollectionKey, DocKey, DocumentStore};

pub struct NoteService<'a> {
    store: &'a dyn DocumentStore,
    session: &'a Session,
}

impl<'a> NoteService<'a> {
    pub fn new(store: &'a dyn DocumentStore, session: &'a Session) -> Self {
        Self { store, session }
    }

    pub fn create(&self, batch: &mut BatchCoordinator<'_>, note: Note) -> JournalResult<Note> {
        let result = self.stage_create(batch, note);
        logged(batch, "createNote", result)
    }

    fn stage_create(&self, batch: &mut BatchCoordinator<'_>, note: Note) -> JournalResult<Note> {
        let user = self.session.require_user()?;
        if note.title.is_empty() && note.content.trim().is_empty() {
            return Err(JournalError::Validation("Note cannot be empty".into()));
        }
        batch.stage(Operation::set(DocKey::Note(user, note.id), &note)?)?;
        Ok(note)
    }

    pub fn update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        id: NoteId,
        update: &NoteUpdate,
    ) -> JournalResult<Note> {
        let result = self.stage_update(batch, id, update);
        logged(batch, "updateNote", result)
    }

    fn stage_update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        id: NoteId,
        update: &NoteUpdate,
    ) -> JournalResult<Note> {
        let user = self.session.require_user()?;
        let mut note = self.get(id)?;
        note.apply(update);
        let fields = changed_fields(&note, update, &[])?;
        batch.stage(Operation::update(DocKey::Note(user, id), fields))?;
        Ok(note)
    }

    /// Stage permanent removal of a note
    pub fn delete(&self, batch: &mut BatchCoordinator<'_>, id: NoteId) -> JournalResult<()> {
        let result = self.stage_delete(batch, id);
        logged(batch, "deleteNote", result)
    }

    fn stage_delete(&self, batch: &mut BatchCoordinator<'_>, id: NoteId) -> JournalResult<()> {
        let user = self.session.require_user()?;
        self.get(id)?;
        batch.stage(Operation::delete(DocKey::Note(user, id)))
    }

    pub fn get(&self, id: NoteId) -> JournalResult<Note> {
        let user = self.session.require_user()?;
        load(self.store, DocKey::Note(user, id))?
            .ok_or_else(|| JournalError::note_not_found(id.to_string()))
    }

    /// Notes, most recently updated first
    pub fn list(&self) -> JournalResult<Vec<Note>> {
        let user = self.session.require_user()?;
        let mut notes: Vec<Note> = load_all(self.store, CollectionKey::Notes(user))?;
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::coordinator;
    use crate::store::MemoryStore;

    #[test]
    fn test_note_create_update_delete() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = NoteService::new(&store, &session);
        let mut batch = coordinator(&store);

        batch.start();
        let note = service
            .create(&mut batch, Note::new("Weekly review", "Overtraded on Monday"))
            .unwrap();
        batch.commit().unwrap();

        batch.start();
        let update = NoteUpdate {
            tags: Some(vec!["discipline".into()]),
            ..NoteUpdate::default()
        };
        service.update(&mut batch, note.id, &update).unwrap();
        batch.commit().unwrap();
        assert_eq!(service.get(note.id).unwrap().tags, vec!["discipline".to_string()]);

        batch.start();
        service.delete(&mut batch, note.id).unwrap();
        batch.commit().unwrap();
        assert!(service.get(note.id).unwrap_err().is_not_found());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_note() {
        let store = MemoryStore::new();
        let session = Session::authenticated("u1");
        let service = NoteService::new(&store, &session);
        let mut batch = coordinator(&store);
        batch.start();

        assert!(service.delete(&mut batch, NoteId::new()).unwrap_err().is_not_found());
        assert_eq!(batch.error_log().last().unwrap().operation, "deleteNote");
    }
}
