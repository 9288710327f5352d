//! Status transitions of events, driven by admin and manager actions

use chrono::NaiveDate;

use crate::error::DeskError;
use crate::event::{Event, EventDraft, EventPatch, EventStatus};
use crate::ids::EventId;
use crate::task::{Task, TaskDraft, TaskTemplate};
use crate::tasks::TaskStore;
use crate::traits::{EventSource, TaskSource};

/// Applies user actions to the events of a source, and keeps track of their tasks.
///
/// Only these transitions are allowed (apart from admin edits and deletions):
/// * `pending` → `in-progress` ([`accept`](Self::accept))
/// * `pending` → `declined` ([`decline`](Self::decline))
/// * `in-progress` → `completed` ([`complete`](Self::complete))
///
/// Whenever the source fails, neither the source nor the task store is modified.
#[derive(Debug)]
pub struct Lifecycle<S>
where
    S: EventSource,
{
    source: S,
    tasks: TaskStore,
}

impl<S> Lifecycle<S>
where
    S: EventSource,
{
    pub fn new(source: S) -> Self {
        Self::with_tasks(source, TaskStore::new())
    }

    pub fn with_tasks(source: S, tasks: TaskStore) -> Self {
        Self { source, tasks }
    }

    /// Returns the underlying event source
    pub fn source(&self) -> &S { &self.source }
    /// Returns the underlying event source
    pub fn source_mut(&mut self) -> &mut S { &mut self.source }
    /// Give the source back, e.g. to save it
    pub fn into_source(self) -> S { self.source }
    pub fn tasks(&self) -> &TaskStore { &self.tasks }
    pub fn tasks_mut(&mut self) -> &mut TaskStore { &mut self.tasks }

    /// Returns every event of the source
    pub async fn list(&self) -> Result<Vec<Event>, DeskError> {
        self.source.list_events().await
    }

    /// Returns an event, or a `NotFound` error
    pub async fn get(&self, id: &EventId) -> Result<Event, DeskError> {
        match self.source.get_event(id).await? {
            Some(event) => Ok(event),
            None => {
                log::warn!("No event {}", id);
                Err(DeskError::not_found("event", id))
            },
        }
    }

    /// Validate the "create event" form and store the new event.
    ///
    /// `today` is the creation day: the event cannot take place before it.
    pub async fn create(&mut self, draft: EventDraft, today: NaiveDate) -> Result<Event, DeskError> {
        let event = draft.validate(today)?;
        self.source.insert_event(event.clone()).await?;
        log::info!("Created event {:?} ({})", event.name, event.id);
        Ok(event)
    }

    /// The manager accepts an event. The [`DEFAULT_TASKS`](crate::config::DEFAULT_TASKS) are created for it.
    ///
    /// This fails (and the event stays `pending`) in case no default task is configured.
    pub async fn accept(&mut self, id: &EventId) -> Result<Event, DeskError> {
        let templates = crate::config::default_tasks();
        self.accept_with(id, &templates).await
    }

    async fn accept_with(&mut self, id: &EventId, templates: &[TaskTemplate]) -> Result<Event, DeskError> {
        if templates.is_empty() {
            log::error!("Cannot accept event {}: no default task is configured", id);
            return Err(DeskError::validation("No default task is configured for accepted events"));
        }
        let event = self.transition(id, EventStatus::Pending, EventStatus::InProgress).await?;
        self.tasks.seed(&event.id, templates, event.date);
        log::info!("Event {} accepted", id);
        Ok(event)
    }

    /// The manager declines an event. A reason is mandatory.
    pub async fn decline(&mut self, id: &EventId, reason: &str) -> Result<Event, DeskError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DeskError::validation("Please provide a reason for declining"));
        }
        let event = self.transition(id, EventStatus::Pending, EventStatus::Declined).await?;
        log::info!("Event {} declined: {}", id, reason);
        Ok(event)
    }

    /// Mark an accepted event as done
    pub async fn complete(&mut self, id: &EventId) -> Result<Event, DeskError> {
        let event = self.transition(id, EventStatus::InProgress, EventStatus::Completed).await?;
        log::info!("Event {} completed", id);
        Ok(event)
    }

    /// Apply an admin edit. Fields are not re-validated.
    pub async fn update(&mut self, id: &EventId, patch: EventPatch) -> Result<Event, DeskError> {
        let mut event = self.get(id).await?;
        event.apply(patch);
        self.source.update_event(event.clone()).await?;
        log::info!("Updated event {}", id);
        Ok(event)
    }

    /// Soft-delete an event: it stays in the source, with a `deleted` status
    pub async fn delete(&mut self, id: &EventId) -> Result<Event, DeskError> {
        let mut event = self.get(id).await?;
        if event.is_deleted() {
            log::debug!("Event {} is already deleted", id);
            return Ok(event);
        }
        event.status = EventStatus::Deleted;
        self.source.update_event(event.clone()).await?;
        log::info!("Deleted event {}", id);
        Ok(event)
    }

    /// Add a task to an existing event
    pub async fn add_task(&mut self, event_id: &EventId, draft: TaskDraft) -> Result<&Task, DeskError> {
        let event = self.get(event_id).await?;
        self.tasks.add(&event.id, draft)
    }

    async fn transition(&mut self, id: &EventId, from: EventStatus, to: EventStatus) -> Result<Event, DeskError> {
        let mut event = self.get(id).await?;
        if event.status != from {
            log::warn!("Cannot move event {} from {} to {}", id, event.status, to);
            return Err(DeskError::validation(format!("This event is {}, it cannot be set {}", event.status, to)));
        }
        event.status = to;
        self.source.update_event(event.clone()).await?;
        Ok(event)
    }
}

impl<S> Lifecycle<S>
where
    S: EventSource + TaskSource,
{
    /// Build a lifecycle over a source, with the tasks this source has stored
    pub async fn load(source: S) -> Result<Self, DeskError> {
        let tasks = source.load_tasks().await?;
        log::debug!("Loaded {} tasks", tasks.stats(None).total);
        Ok(Self::with_tasks(source, tasks))
    }

    /// Store the current tasks into the source
    pub async fn save_tasks(&mut self) -> Result<(), DeskError> {
        self.source.save_tasks(&self.tasks).await
    }
}
