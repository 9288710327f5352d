//! Data sources the controllers are built on.
//!
//! Both an in-memory [`Cache`](crate::cache::Cache) and a remote [`Client`](crate::client::Client) implement them,
//! so that the controllers can be used against the real service as well as in tests.

use async_trait::async_trait;

use crate::error::DeskError;
use crate::ids::{EventId, ManagerId};
use crate::manager::{Manager, Role};
use crate::tasks::TaskStore;
use crate::Event;

/// A source that stores events (the `events` table)
#[async_trait]
pub trait EventSource {
    /// Returns every event, in storage order
    async fn list_events(&self) -> Result<Vec<Event>, DeskError>;
    /// Returns the event matching this id, if any
    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, DeskError>;
    /// Store a new event
    async fn insert_event(&mut self, event: Event) -> Result<(), DeskError>;
    /// Replace the stored event that has the same id
    async fn update_event(&mut self, event: Event) -> Result<(), DeskError>;
    /// Hard-delete an event.
    /// The lifecycle controller never calls this (events are soft-deleted), but maintenance tools may.
    async fn remove_event(&mut self, id: &EventId) -> Result<(), DeskError>;
}

/// A source that knows who holds which role, and the profiles of these people
#[async_trait]
pub trait DirectorySource {
    /// Returns the ids of the users that hold a given role (the `user_roles` table)
    async fn user_ids_with_role(&self, role: Role) -> Result<Vec<ManagerId>, DeskError>;
    /// Returns the profiles of the given users (the `profiles` table).
    /// Their `assigned_events_count` is filled in.
    async fn profiles(&self, ids: &[ManagerId]) -> Result<Vec<Manager>, DeskError>;

    /// Store a new profile, and grant it a role
    async fn insert_profile(&mut self, profile: Manager, role: Role) -> Result<(), DeskError>;
    /// Replace the stored profile that has the same id
    async fn update_profile(&mut self, profile: Manager) -> Result<(), DeskError>;
    /// Delete a profile, as well as every role it holds
    async fn remove_profile(&mut self, id: &ManagerId) -> Result<(), DeskError>;
}

/// A source that keeps the tasks of the events (the `tasks` table)
#[async_trait]
pub trait TaskSource {
    /// Returns every stored task
    async fn load_tasks(&self) -> Result<TaskStore, DeskError>;
    /// Store every task of `tasks`, replacing the stored tasks that have the same ids
    async fn save_tasks(&mut self, tasks: &TaskStore) -> Result<(), DeskError>;
}
