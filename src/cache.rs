//! This module provides an in-memory store for events, managers and tasks, that can be saved to a local file

use std::path::PathBuf;
use std::path::Path;
use std::error::Error;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::DeskError;
use crate::event::Event;
use crate::ids::{EventId, ManagerId};
use crate::manager::{count_assignments, Manager, Role, RoleAssignment};
use crate::mock_behaviour::MockBehaviour;
use crate::task::Task;
use crate::tasks::TaskStore;
use crate::traits::{DirectorySource, EventSource, TaskSource};


/// A source that keeps its records in memory, and (optionally) in a local JSON file
///
/// This is used when no remote service is available, and as a test double for it.
#[derive(Debug)]
pub struct Cache {
    backing_file: Option<PathBuf>,
    data: CachedData,

    /// In tests, this may fake failures of the persistence service
    mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>,
}

#[derive(Default, Debug, PartialEq, Serialize, Deserialize)]
struct CachedData {
    events: Vec<Event>,
    profiles: Vec<Manager>,
    roles: Vec<RoleAssignment>,
    #[serde(default)]
    tasks: TaskStore,
}

impl Cache {
    /// Initialize a cache from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self{
            backing_file: Some(PathBuf::from(path)),
            data,
            mock_behaviour: None,
        })
    }

    /// Initialize an empty cache, that will be saved to `path`
    pub fn new(path: &Path) -> Self {
        Self{
            backing_file: Some(PathBuf::from(path)),
            data: CachedData::default(),
            mock_behaviour: None,
        }
    }

    /// Initialize an empty cache that is never saved
    pub fn in_memory() -> Self {
        Self{
            backing_file: None,
            data: CachedData::default(),
            mock_behaviour: None,
        }
    }

    /// Initialize a cache that contains the [`sample`](crate::sample) events and managers
    pub fn with_samples(first_day: NaiveDate) -> Self {
        let mut cache = Self::in_memory();
        cache.data.events = crate::sample::sample_events(first_day);
        for manager in crate::sample::sample_managers() {
            cache.add_profile(manager, Role::Manager);
        }
        cache
    }

    /// Change the file this cache is saved to (`None` to never save it)
    pub fn set_backing_file(&mut self, path: Option<&Path>) {
        self.backing_file = path.map(PathBuf::from);
    }

    /// Make this cache fail some actions, as described by `mock_behaviour`
    pub fn set_mock_behaviour(&mut self, mock_behaviour: Option<Arc<Mutex<MockBehaviour>>>) {
        self.mock_behaviour = mock_behaviour;
    }

    /// Store the current Cache to its backing file.
    /// This is a no-op for caches that have no backing file
    pub fn save_to_file(&self) -> Result<(), Box<dyn Error>> {
        let path = match &self.backing_file {
            None => return Ok(()),
            Some(path) => path,
        };
        let file = std::fs::File::create(path)
            .map_err(|err| format!("Unable to save file {:?}: {}", path, err))?;
        serde_json::to_writer(file, &self.data)?;
        log::debug!("Cache saved to {:?}", path);
        Ok(())
    }

    /// Store an event without going through the mock behaviour
    pub fn add_event(&mut self, event: Event) {
        self.data.events.push(event);
    }

    /// Store a profile and grant it a role, without going through the mock behaviour
    pub fn add_profile(&mut self, profile: Manager, role: Role) {
        self.data.roles.push(RoleAssignment{ user_id: profile.id.clone(), role });
        self.data.profiles.push(profile);
    }

    /// Compares two Caches to check they have the same current content
    pub fn has_same_contents_than(&self, other: &Self) -> bool {
        self.data == other.data
    }

    fn check<F>(&self, can: F) -> Result<(), DeskError>
    where
        F: FnOnce(&mut MockBehaviour) -> Result<(), DeskError>,
    {
        match &self.mock_behaviour {
            None => Ok(()),
            Some(behaviour) => can(&mut *behaviour.lock().unwrap()),
        }
    }

    fn event_position(&self, id: &EventId) -> Result<usize, DeskError> {
        self.data.events.iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| DeskError::not_found("event", id))
    }
}

#[async_trait]
impl EventSource for Cache {
    async fn list_events(&self) -> Result<Vec<Event>, DeskError> {
        self.check(MockBehaviour::can_list_events)?;
        Ok(self.data.events.clone())
    }

    async fn get_event(&self, id: &EventId) -> Result<Option<Event>, DeskError> {
        self.check(MockBehaviour::can_get_event)?;
        Ok(self.data.events.iter().find(|e| &e.id == id).cloned())
    }

    async fn insert_event(&mut self, event: Event) -> Result<(), DeskError> {
        self.check(MockBehaviour::can_insert_event)?;
        if self.data.events.iter().any(|e| e.id == event.id) {
            return Err(DeskError::remote(format!("duplicate key value violates unique constraint (id {})", event.id)));
        }
        self.data.events.push(event);
        Ok(())
    }

    async fn update_event(&mut self, event: Event) -> Result<(), DeskError> {
        self.check(MockBehaviour::can_update_event)?;
        let index = self.event_position(&event.id)?;
        self.data.events[index] = event;
        Ok(())
    }

    async fn remove_event(&mut self, id: &EventId) -> Result<(), DeskError> {
        self.check(MockBehaviour::can_remove_event)?;
        let index = self.event_position(id)?;
        self.data.events.remove(index);
        Ok(())
    }
}

#[async_trait]
impl DirectorySource for Cache {
    async fn user_ids_with_role(&self, role: Role) -> Result<Vec<ManagerId>, DeskError> {
        self.check(MockBehaviour::can_get_user_ids_with_role)?;
        Ok(self.data.roles.iter()
            .filter(|r| r.role == role)
            .map(|r| r.user_id.clone())
            .collect()
        )
    }

    async fn profiles(&self, ids: &[ManagerId]) -> Result<Vec<Manager>, DeskError> {
        self.check(MockBehaviour::can_get_profiles)?;
        Ok(self.data.profiles.iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| {
                let mut profile = p.clone();
                profile.assigned_events_count = count_assignments(&self.data.events, &p.id);
                profile
            })
            .collect()
        )
    }

    async fn insert_profile(&mut self, profile: Manager, role: Role) -> Result<(), DeskError> {
        self.check(MockBehaviour::can_write_profile)?;
        if self.data.profiles.iter().any(|p| p.id == profile.id) {
            return Err(DeskError::remote(format!("duplicate key value violates unique constraint (user_id {})", profile.id)));
        }
        self.add_profile(profile, role);
        Ok(())
    }

    async fn update_profile(&mut self, profile: Manager) -> Result<(), DeskError> {
        self.check(MockBehaviour::can_write_profile)?;
        match self.data.profiles.iter_mut().find(|p| p.id == profile.id) {
            None => Err(DeskError::not_found("manager", &profile.id)),
            Some(stored) => {
                *stored = profile;
                Ok(())
            },
        }
    }

    async fn remove_profile(&mut self, id: &ManagerId) -> Result<(), DeskError> {
        self.check(MockBehaviour::can_write_profile)?;
        let before = self.data.profiles.len();
        self.data.profiles.retain(|p| &p.id != id);
        if self.data.profiles.len() == before {
            return Err(DeskError::not_found("manager", id));
        }
        self.data.roles.retain(|r| &r.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl TaskSource for Cache {
    async fn load_tasks(&self) -> Result<TaskStore, DeskError> {
        self.check(MockBehaviour::can_load_tasks)?;
        Ok(self.data.tasks.clone())
    }

    async fn save_tasks(&mut self, tasks: &TaskStore) -> Result<(), DeskError> {
        self.check(MockBehaviour::can_save_tasks)?;
        let mut merged: Vec<Task> = self.data.tasks.iter()
            .filter(|stored| tasks.get(stored.id()).is_none())
            .cloned()
            .collect();
        merged.extend(tasks.iter().cloned());
        self.data.tasks = merged.into_iter().collect();
        Ok(())
    }
}
