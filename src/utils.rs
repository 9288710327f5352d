//! Some utility functions

use std::cmp::Ordering;

use crate::event::{Event, EventStatus};
use crate::manager::Manager;
use crate::task::{AssignmentState, Task, TaskStatus};
use crate::view::Projection;

/// Compare events by date, then by time (events with no time come first), then alphabetically
pub fn compare_events_by_date(left: &Event, right: &Event) -> Ordering {
    left.date.cmp(&right.date)
        .then_with(|| left.time.cmp(&right.time))
        .then_with(|| Ord::cmp(&left.name.to_lowercase(), &right.name.to_lowercase()))
}

/// A debug utility that pretty-prints the groups of a projection
pub fn print_projection(projection: &Projection) {
    println!("ONGOING ({})", projection.ongoing.len());
    for event in &projection.ongoing {
        print_event(event);
    }
    println!("UPCOMING ({}), page {}/{}", projection.upcoming.len(), projection.page.number, projection.page.total_pages);
    for event in &projection.page.items {
        print_event(event);
    }
    println!("DELETED ({})", projection.deleted.len());
    for event in &projection.deleted {
        print_event(event);
    }
}

pub fn print_event(event: &Event) {
    let status = match event.status {
        EventStatus::Pending => " ",
        EventStatus::InProgress => "~",
        EventStatus::Completed => "✓",
        EventStatus::Declined => "-",
        EventStatus::Deleted => "x",
    };
    let time = event.time
        .map(|t| t.format(" %H:%M").to_string())
        .unwrap_or_default();
    println!("    {} {}{}\t{}\t{} ({})", status, event.date, time, event.name, event.venue, event.id);
}

pub fn print_task(task: &Task) {
    let completion = match task.status() {
        TaskStatus::NotStarted => " ",
        TaskStatus::InProgress => "~",
        TaskStatus::Completed => "✓",
    };
    let assignment = match task.assignment() {
        AssignmentState::Pending => "?",
        AssignmentState::Accepted => "=",
        AssignmentState::Declined => "x",
    };
    println!("    {}{} {}\t{} (due {})\t{}", completion, assignment, task.name(), task.assigned_to(), task.due_date(), task.id());
}

pub fn print_manager(manager: &Manager) {
    println!("    {}\t{} events\t{}", manager.display_name(), manager.assigned_events_count, manager.id);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use crate::ids::EventId;

    fn event(name: &str, date: &str) -> Event {
        Event {
            id: EventId::random(),
            name: name.to_string(),
            event_type: EventType::Public,
            date: date.parse().unwrap(),
            time: None,
            venue: "City Hall".to_string(),
            status: EventStatus::Pending,
            description: None,
            attendee_count: None,
            assigned_manager_id: None,
        }
    }

    #[test]
    fn events_sort_by_date_then_name() {
        let mut events = vec![
            event("b", "2025-03-01"),
            event("A", "2025-03-01"),
            event("z", "2025-01-01"),
        ];
        events.sort_by(compare_events_by_date);
        let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["z", "A", "b"]);
    }
}
