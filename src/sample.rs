//! Static mock data, used when no remote service is configured (and by the demo)

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::event::{Event, EventStatus, EventType};
use crate::ids::{EventId, ManagerId};
use crate::manager::{Manager, ManagerStatus};

/// How many events [`sample_events`] generates
pub const SAMPLE_EVENT_COUNT: usize = 30;

const NAMES: [&str; 10] = [
    "Annual Tech Conference",
    "Product Launch Event",
    "Team Building Retreat",
    "Charity Gala Dinner",
    "Summer Music Festival",
    "Board Meeting",
    "Art Exhibition Opening",
    "Wedding Reception",
    "Startup Pitch Night",
    "Cultural Heritage Fair",
];

const VENUES: [&str; 5] = [
    "Convention Center",
    "Grand Hotel Ballroom",
    "Mountain Resort",
    "City Hall",
    "Riverside Park",
];

/// Generate [`SAMPLE_EVENT_COUNT`] events, one every three days starting on `first_day`.
///
/// Their ids are `"1"`, `"2"`... Statuses cycle through pending, in-progress, completed and declined, and every tenth event is deleted.
/// Events are assigned to managers `"1"` and `"2"` of [`sample_managers`], never to `"3"`.
pub fn sample_events(first_day: NaiveDate) -> Vec<Event> {
    (0..SAMPLE_EVENT_COUNT)
        .map(|i| {
            let status = if i % 10 == 9 {
                EventStatus::Deleted
            } else {
                match i % 4 {
                    0 => EventStatus::Pending,
                    1 => EventStatus::InProgress,
                    2 => EventStatus::Completed,
                    _ => EventStatus::Declined,
                }
            };
            let event_type = match i % 5 {
                0 => EventType::Corporate,
                1 => EventType::Public,
                2 => EventType::Private,
                3 => EventType::Cultural,
                _ => EventType::Personal,
            };
            let round = i / NAMES.len();
            let name = match round {
                0 => NAMES[i].to_string(),
                n => format!("{} #{}", NAMES[i % NAMES.len()], n + 1),
            };

            Event {
                id: EventId::from((i + 1).to_string()),
                name,
                event_type,
                date: first_day + Duration::days(3 * i as i64),
                time: NaiveTime::from_hms_opt(9 + (i % 8) as u32, 0, 0),
                venue: VENUES[i % VENUES.len()].to_string(),
                status,
                description: None,
                attendee_count: Some(50 * (1 + (i % 10) as u32)),
                assigned_manager_id: Some(ManagerId::from(if i % 2 == 0 { "1" } else { "2" })),
            }
        })
        .collect()
}

/// Three managers. The last one is inactive
pub fn sample_managers() -> Vec<Manager> {
    vec![
        sample_manager("1", "John Smith", "john.smith@example.com", "+1234567890", ManagerStatus::Active),
        sample_manager("2", "Sarah Johnson", "sarah.johnson@example.com", "+1987654321", ManagerStatus::Active),
        sample_manager("3", "Michael Brown", "michael.brown@example.com", "+1122334455", ManagerStatus::Inactive),
    ]
}

fn sample_manager(id: &str, name: &str, email: &str, mobile: &str, status: ManagerStatus) -> Manager {
    Manager {
        id: ManagerId::from(id),
        full_name: Some(name.to_string()),
        email: Some(email.to_string()),
        mobile: Some(mobile.to_string()),
        status,
        assigned_events_count: 0,
    }
}
