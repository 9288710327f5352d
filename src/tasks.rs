//! The tasks of every event

use std::collections::HashMap;
use std::iter::FromIterator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::ids::{EventId, TaskId};
use crate::task::{AssignmentState, Task, TaskDraft, TaskStatus, TaskTemplate};

/// Per-event, ordered lists of tasks.
///
/// A task belongs to exactly one event, and tasks are never deleted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStore {
    tasks: HashMap<EventId, Vec<Task>>,
}

/// Counters shown on the manager dashboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the "add task" form and append the new task to the event.
    ///
    /// This does not check the event exists, see [`Lifecycle::add_task`](crate::Lifecycle::add_task).
    pub fn add(&mut self, event_id: &EventId, draft: TaskDraft) -> Result<&Task, DeskError> {
        let task = draft.validate(event_id.clone())?;
        log::info!("Adding task {:?} ({}) to event {}", task.name(), task.id(), event_id);
        Ok(self.push(task))
    }

    /// Append a task for each template, all of them due on `due_date`
    pub fn seed(&mut self, event_id: &EventId, templates: &[TaskTemplate], due_date: NaiveDate) -> &[Task] {
        let first_new = self.tasks_for(event_id).len();
        for template in templates {
            self.push(template.instantiate(event_id.clone(), due_date));
        }
        log::debug!("Seeded {} tasks for event {}", templates.len(), event_id);
        &self.tasks_for(event_id)[first_new..]
    }

    fn push(&mut self, task: Task) -> &Task {
        let list = self.tasks.entry(task.event_id().clone()).or_insert_with(Vec::new);
        list.push(task);
        &list[list.len() - 1]
    }

    /// The tasks of an event, in creation order
    pub fn tasks_for(&self, event_id: &EventId) -> &[Task] {
        self.tasks.get(event_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every task of every event
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values().flat_map(|list| list.iter())
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.values()
            .flat_map(|list| list.iter())
            .find(|t| t.id() == task_id)
    }

    fn get_mut(&mut self, task_id: &TaskId) -> Result<&mut Task, DeskError> {
        self.tasks.values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|t| t.id() == task_id)
            .ok_or_else(|| DeskError::not_found("task", task_id))
    }

    /// Every task assigned to a stakeholder (case-insensitive name match)
    pub fn assigned_to(&self, assignee: &str) -> Vec<&Task> {
        let assignee = assignee.trim().to_lowercase();
        let mut result: Vec<&Task> = self.tasks.values()
            .flat_map(|list| list.iter())
            .filter(|t| t.assigned_to().to_lowercase() == assignee)
            .collect();
        result.sort_by_key(|t| t.due_date());
        result
    }

    /// Set the status of a task, whatever its current status is
    pub fn set_status(&mut self, task_id: &TaskId, status: TaskStatus) -> Result<(), DeskError> {
        let task = self.get_mut(task_id)?;
        log::info!("Task {} is now {}", task_id, status);
        task.set_status(status);
        Ok(())
    }

    /// Record the answer of the stakeholder a task is assigned to
    pub fn respond(&mut self, task_id: &TaskId, accepted: bool) -> Result<(), DeskError> {
        let task = self.get_mut(task_id)?;
        let new_state = if accepted { AssignmentState::Accepted } else { AssignmentState::Declined };
        log::info!("{} {} task {}", task.assigned_to(), if accepted { "accepted" } else { "declined" }, task_id);
        task.set_assignment(new_state);
        Ok(())
    }

    /// Send a reminder to the assignee of a task.
    ///
    /// There is no delivery channel yet: this only logs the dispatch.
    pub fn notify(&self, task_id: &TaskId) -> Result<(), DeskError> {
        let task = self.get(task_id)
            .ok_or_else(|| DeskError::not_found("task", task_id))?;
        log::info!("Notification sent to {} about task {:?}", task.assigned_to(), task.name());
        Ok(())
    }

    /// Count tasks by status, either for a single event or for all of them
    pub fn stats(&self, event_id: Option<&EventId>) -> TaskStats {
        let tasks: Vec<&Task> = match event_id {
            Some(id) => self.tasks_for(id).iter().collect(),
            None => self.tasks.values().flat_map(|list| list.iter()).collect(),
        };

        let mut stats = TaskStats::default();
        for task in tasks {
            stats.total += 1;
            match task.status() {
                TaskStatus::NotStarted => stats.not_started += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }
        stats
    }
}

impl FromIterator<Task> for TaskStore {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut store = Self::new();
        for task in iter {
            store.push(task);
        }
        store
    }
}
