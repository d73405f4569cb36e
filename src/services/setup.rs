//! Setup service

use super::{changed_fields, load, load_all, logged, soft_delete_fields};
use crate::batch::{BatchCoordinator, Operation};
use crate::error::{JournalError, JournalResult};
use crate::models::{timestamp_now, Setup, SetupId, SetupUpdate};
use crate::session::Session;
use crate::store::{CollectionKey, DocKey, DocumentStore};

/// Service for trading setups
pub struct SetupService<'a> {
    store: &'a dyn DocumentStore,
    session: &'a Session,
}

impl<'a> SetupService<'a> {
    pub fn new(store: &'a dyn DocumentStore, session: &'a Session) -> Self {
        Self { store, session }
    }

    /// Stage creation of a setup
    pub fn create(&self, batch: &mut BatchCoordinator<'_>, setup: Setup) -> JournalResult<Setup> {
        let result = self.stage_create(batch, setup);
        logged(batch, "createSetup", result)
    }

    fn stage_create(&self, batch: &mut BatchCoordinator<'_>, setup: Setup) -> JournalResult<Setup> {
        let user = self.session.require_user()?;
        setup.validate().map_err(JournalError::Validation)?;
        batch.stage(Operation::set(DocKey::Setup(user, setup.id), &setup)?)?;
        Ok(setup)
    }

    /// Stage an edit of a setup
    pub fn update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        id: SetupId,
        update: &SetupUpdate,
    ) -> JournalResult<Setup> {
        let result = self.stage_update(batch, id, update);
        logged(batch, "updateSetup", result)
    }

    fn stage_update(
        &self,
        batch: &mut BatchCoordinator<'_>,
        id: SetupId,
        update: &SetupUpdate,
    ) -> JournalResult<Setup> {
        let user = self.session.require_user()?;
        let mut setup = self.get(id)?;
        setup.apply(update);
        setup.validate().map_err(JournalError::Validation)?;

        let fields = changed_fields(&setup, update, &[])?;
        batch.stage(Operation::update(DocKey::Setup(user, id), fields))?;
        Ok(setup)
    }

    /// Stage a soft delete of a setup
    pub fn soft_delete(&self, batch: &mut BatchCoordinator<'_>, id: SetupId) -> JournalResult<Setup> {
        let result = self.stage_soft_delete(batch, id);
        logged(batch, "softDeleteSetup", result)
    }

    fn stage_soft_delete(&self, batch: &mut BatchCoordinator<'_>, id: SetupId) -> JournalResult<Setup> {
        let user = self.session.require_user()?;
        let mut setup = self.get(id)?;

        let now = timestamp_now();
        batch.stage(Operation::update(DocKey::Setup(user, id), soft_delete_fields(now)))?;

        setup.is_deleted = true;
        setup.deleted_at = Some(now);
        setup.updated_at = now;
        Ok(setup)
    }

    pub fn get(&self, id: SetupId) -> JournalResult<Setup> {
        let user = self.session.require_user()?;
        load(self.store, DocKey::Setup(user, id))?
            .ok_or_else(|| JournalError::setup_not_found(id.to_string()))
    }

    /// Setups ordered by name
    pub fn list(&self, include_deleted: bool) -> JournalResult<Vec<Setup>> {
        let user = self.session.require_user()?;
        let mut setups: Vec<Setup> = load_all(self.store, CollectionKey::Setups(user))?;
        if !include_deleted {
            setups.retain(|s| !s.is_deleted);
        }
        setups.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(setups)
    }
}
