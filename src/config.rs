//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

use crate::task::TaskTemplate;

/// How many events are shown on a page of the dashboard, unless the view says otherwise
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// The tasks that are created on an event as soon as its manager accepts it.
/// Feel free to override it when initing this library. It must not be left empty: events cannot be accepted without default tasks.
pub static DEFAULT_TASKS: Lazy<Arc<Mutex<Vec<TaskTemplate>>>> = Lazy::new(|| Arc::new(Mutex::new(vec![
    TaskTemplate::new("Setup venue decorations", "XYZ Decorations"),
    TaskTemplate::new("Arrange catering", "ABC Catering"),
])));

/// A snapshot of the current [`DEFAULT_TASKS`]
pub fn default_tasks() -> Vec<TaskTemplate> {
    DEFAULT_TASKS.lock().unwrap().clone()
}
