//! The list of managers events can be assigned to

use crate::error::DeskError;
use crate::ids::ManagerId;
use crate::manager::{Manager, ManagerDraft, Role};
use crate::traits::DirectorySource;

/// Reads and edits the managers of a [`DirectorySource`]
#[derive(Debug)]
pub struct ManagerDirectory<S>
where
    S: DirectorySource,
{
    source: S,
}

impl<S> ManagerDirectory<S>
where
    S: DirectorySource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S { &self.source }
    pub fn source_mut(&mut self) -> &mut S { &mut self.source }
    pub fn into_source(self) -> S { self.source }

    /// Returns every user holding the `manager` role.
    ///
    /// This first looks up the role assignments, then the matching profiles.
    pub async fn list(&self) -> Result<Vec<Manager>, DeskError> {
        let ids = self.source.user_ids_with_role(Role::Manager).await?;
        if ids.is_empty() {
            log::debug!("No user has the manager role");
            return Ok(Vec::new());
        }
        self.source.profiles(&ids).await
    }

    /// Returns a manager, or a `NotFound` error
    pub async fn get(&self, id: &ManagerId) -> Result<Manager, DeskError> {
        self.list().await?
            .into_iter()
            .find(|m| &m.id == id)
            .ok_or_else(|| DeskError::not_found("manager", id))
    }

    /// A manager can only be deleted once no live event is assigned to them
    pub async fn can_delete(&self, id: &ManagerId) -> Result<bool, DeskError> {
        let manager = self.get(id).await?;
        Ok(manager.assigned_events_count == 0)
    }

    pub async fn delete(&mut self, id: &ManagerId) -> Result<(), DeskError> {
        let manager = self.get(id).await?;
        if manager.assigned_events_count > 0 {
            log::warn!("Refusing to delete manager {}: {} events are assigned", id, manager.assigned_events_count);
            return Err(DeskError::validation("Cannot delete manager with active events"));
        }
        self.source.remove_profile(id).await?;
        log::info!("Manager {:?} deleted", manager.display_name());
        Ok(())
    }

    /// Validate the "create manager" form, and add the manager to the directory
    pub async fn create(&mut self, draft: ManagerDraft) -> Result<Manager, DeskError> {
        let manager = draft.validate(ManagerId::random())?;
        self.source.insert_profile(manager.clone(), Role::Manager).await?;
        log::info!("Manager {:?} created", manager.display_name());
        Ok(manager)
    }

    /// Replace the profile fields of a manager
    pub async fn update(&mut self, id: &ManagerId, draft: ManagerDraft) -> Result<Manager, DeskError> {
        let current = self.get(id).await?;
        let mut manager = draft.validate(id.clone())?;
        manager.assigned_events_count = current.assigned_events_count;
        self.source.update_profile(manager.clone()).await?;
        log::info!("Manager {:?} updated", manager.display_name());
        Ok(manager)
    }
}
