//! Tasks: units of work under one event, assigned to a stakeholder or a vendor

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::event::required;
use crate::ids::{EventId, TaskId};

/// The progress of a task.
///
/// There is no transition table: any status can be set from any other one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::InProgress => write!(f, "in progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Whether the stakeholder has taken the assignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentState {
    Pending,
    Accepted,
    Declined,
}

/// A task of an event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    event_id: EventId,
    name: String,
    /// Free-text name of the stakeholder or vendor
    assigned_to: String,
    due_date: NaiveDate,
    status: TaskStatus,
    assignment: AssignmentState,
}

impl Task {
    /// Create a brand new task, with a random id.
    pub fn new(event_id: EventId, name: String, assigned_to: String, due_date: NaiveDate) -> Self {
        Self {
            id: TaskId::random(),
            event_id,
            name,
            assigned_to,
            due_date,
            status: TaskStatus::NotStarted,
            assignment: AssignmentState::Pending,
        }
    }

    pub fn id(&self) -> &TaskId                 { &self.id          }
    pub fn event_id(&self) -> &EventId          { &self.event_id    }
    pub fn name(&self) -> &str                  { &self.name        }
    pub fn assigned_to(&self) -> &str           { &self.assigned_to }
    pub fn due_date(&self) -> NaiveDate         { self.due_date     }
    pub fn status(&self) -> TaskStatus          { self.status       }
    pub fn assignment(&self) -> AssignmentState { self.assignment   }
    pub fn completed(&self) -> bool { self.status == TaskStatus::Completed }

    pub fn set_status(&mut self, new_status: TaskStatus) {
        self.status = new_status;
    }

    pub fn set_assignment(&mut self, new_state: AssignmentState) {
        self.assignment = new_state;
    }
}

/// The content of the "add task" form, before validation
#[derive(Clone, Debug, Default)]
pub struct TaskDraft {
    pub name: String,
    pub assigned_to: String,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn validate(self, event_id: EventId) -> Result<Task, DeskError> {
        let name = required(&self.name, "task name")?;
        let assigned_to = required(&self.assigned_to, "assignee")?;
        let due_date = self.due_date.ok_or_else(|| DeskError::validation("Please fill in the due date"))?;
        Ok(Task::new(event_id, name, assigned_to, due_date))
    }
}

/// A task that is created on every event once its manager accepts it
#[derive(Clone, Debug, PartialEq)]
pub struct TaskTemplate {
    pub name: String,
    pub assigned_to: String,
}

impl TaskTemplate {
    pub fn new<S: ToString, T: ToString>(name: S, assigned_to: T) -> Self {
        Self { name: name.to_string(), assigned_to: assigned_to.to_string() }
    }

    pub fn instantiate(&self, event_id: EventId, due_date: NaiveDate) -> Task {
        Task::new(event_id, self.name.clone(), self.assigned_to.clone(), due_date)
    }
}
