//! This crate provides the domain core of an event-management dashboard.
//!
//! Admins create, edit and delete events, and assign them to managers. Managers accept or decline the events they are assigned,
//! then track the tasks of the events they have accepted. Stakeholders accept or decline the tasks they are assigned.
//!
//! Records live in a data source (see the [`traits`] module): either a remote table service ([`client::Client`]),
//! or an in-memory [`cache::Cache`], that can be saved to a local file and is also used as a test double. \
//! On top of them:
//! * a [`Lifecycle`] applies status changes to events, and keeps their tasks in a [`TaskStore`],
//! * a [`ManagerDirectory`] lists and edits managers,
//! * an [`EventView`](view::EventView) filters, groups and paginates events for display.

pub mod traits;
pub mod error;
pub use error::DeskError;

mod ids;
pub use ids::{EventId, ManagerId, TaskId};
pub mod event;
pub use event::Event;
pub mod task;
pub use task::Task;
pub mod manager;
pub use manager::Manager;

pub mod lifecycle;
pub use lifecycle::Lifecycle;
pub mod tasks;
pub use tasks::TaskStore;
pub mod view;
pub mod directory;
pub use directory::ManagerDirectory;

pub mod client;
pub mod cache;
pub mod resource;
pub mod mock_behaviour;
pub mod sample;

pub mod config;
pub mod utils;
