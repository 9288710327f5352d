//! A demo of event-desk.
//!
//! If `EVENT_DESK_URL` (and `EVENT_DESK_API_KEY`) are set, this works against the remote table service.
//! Otherwise, it works on sample data, saved to `desk_cache.json`.
//! Set `RUST_LOG` to see more or less details.

use std::path::Path;

use chrono::Local;

use event_desk::cache::Cache;
use event_desk::client::Client;
use event_desk::event::EventStatus;
use event_desk::resource::Resource;
use event_desk::task::TaskStatus;
use event_desk::traits::{DirectorySource, EventSource, TaskSource};
use event_desk::view::{DashboardStats, EventView, StatusFilter};
use event_desk::{DeskError, Lifecycle, ManagerDirectory};

const CACHE_FILE: &str = "desk_cache.json";

#[tokio::main]
async fn main() {
    env_logger::init();

    let result = match Resource::from_env() {
        Ok(resource) => {
            println!("Using the table service at {}", resource.url());
            run(Client::from_resource(resource)).await.map(|_client| ())
        },
        Err(err) => {
            println!("{}: using local data from {}", err, CACHE_FILE);
            let cache_path = Path::new(CACHE_FILE);
            let cache = match Cache::from_file(cache_path) {
                Ok(cache) => cache,
                Err(err) => {
                    log::warn!("Invalid cache file: {}. Using sample data", err);
                    let mut cache = Cache::with_samples(Local::now().date_naive());
                    cache.set_backing_file(Some(cache_path));
                    cache
                }
            };
            run(cache).await.and_then(|cache| {
                cache.save_to_file()
                    .map_err(|err| DeskError::remote(err.to_string()))
            })
        }
    };

    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

/// Walk through a manager's day: accept the first pending event, then work on its tasks
async fn run<S>(source: S) -> Result<S, DeskError>
where
    S: EventSource + DirectorySource + TaskSource,
{
    let directory = ManagerDirectory::new(source);
    println!("---- Managers -----");
    for manager in directory.list().await? {
        event_desk::utils::print_manager(&manager);
    }

    let mut lifecycle = Lifecycle::load(directory.into_source()).await?;
    let events = lifecycle.list().await?;

    let mut view = EventView::default();
    println!("---- Dashboard -----");
    event_desk::utils::print_projection(&view.project(&events));
    let stats = DashboardStats::from_events(&events);
    println!("{} events, {} completed", stats.total, stats.completed);

    view.set_status(StatusFilter::Only(EventStatus::Pending));
    let first_pending = view.project(&events).page.items.first().map(|e| e.id.clone());
    let event_id = match first_pending {
        None => {
            println!("No pending event");
            return Ok(lifecycle.into_source());
        },
        Some(id) => id,
    };

    let accepted = lifecycle.accept(&event_id).await?;
    println!("---- Accepted {:?}, tasks: -----", accepted.name);
    let task_ids: Vec<_> = lifecycle.tasks().tasks_for(&event_id)
        .iter()
        .map(|t| t.id().clone())
        .collect();
    for task_id in &task_ids {
        lifecycle.tasks().notify(task_id)?;
    }
    if let Some(first) = task_ids.first() {
        lifecycle.tasks_mut().respond(first, true)?;
        lifecycle.tasks_mut().set_status(first, TaskStatus::InProgress)?;
    }
    for task in lifecycle.tasks().tasks_for(&event_id) {
        event_desk::utils::print_task(task);
    }

    lifecycle.save_tasks().await?;
    Ok(lifecycle.into_source())
}
