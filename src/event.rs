//! Events, the schedulable occasions managed by the dashboard

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::DeskError;
use crate::ids::{EventId, ManagerId};

/// The kind of occasion. Unknown kinds are kept as they were typed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Private,
    Public,
    Corporate,
    Cultural,
    Personal,
    Other(String),
}

impl From<String> for EventType {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "private" => Self::Private,
            "public" => Self::Public,
            "corporate" => Self::Corporate,
            "cultural" => Self::Cultural,
            "personal" => Self::Personal,
            _ => Self::Other(s),
        }
    }
}

impl From<EventType> for String {
    fn from(t: EventType) -> String {
        t.to_string()
    }
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Public => write!(f, "public"),
            Self::Corporate => write!(f, "corporate"),
            Self::Cultural => write!(f, "cultural"),
            Self::Personal => write!(f, "personal"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Where an event stands in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    /// Created, waiting for its manager to accept or decline it
    Pending,
    /// Accepted by its manager
    InProgress,
    Completed,
    /// Refused by its manager
    Declined,
    /// Soft-deleted by an admin. It is still stored, and shown in the "Deleted" group
    Deleted,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Declined => "declined",
            Self::Deleted => "deleted",
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "declined" => Ok(Self::Declined),
            "deleted" => Ok(Self::Deleted),
            other => Err(DeskError::validation(format!("Unknown event status {:?}", other))),
        }
    }
}

/// An event record, as stored in the `events` table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: NaiveDate,
    #[serde(default, with = "clock_time")]
    pub time: Option<NaiveTime>,
    pub venue: String,
    pub status: EventStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attendee_count: Option<u32>,
    #[serde(default)]
    pub assigned_manager_id: Option<ManagerId>,
}

impl Event {
    pub fn is_deleted(&self) -> bool {
        self.status == EventStatus::Deleted
    }

    /// Apply a partial edit.
    ///
    /// Fields are replaced as-is: e.g. the date is not checked against the current day again.
    pub fn apply(&mut self, patch: EventPatch) {
        let EventPatch { name, event_type, date, time, venue, description, attendee_count, assigned_manager_id } = patch;
        if let Some(name) = name { self.name = name; }
        if let Some(event_type) = event_type { self.event_type = event_type; }
        if let Some(date) = date { self.date = date; }
        if let Some(time) = time { self.time = time; }
        if let Some(venue) = venue { self.venue = venue; }
        if let Some(description) = description { self.description = description; }
        if let Some(attendee_count) = attendee_count { self.attendee_count = attendee_count; }
        if let Some(assigned_manager_id) = assigned_manager_id { self.assigned_manager_id = assigned_manager_id; }
    }
}

/// The content of the "create event" form, before validation
#[derive(Clone, Debug, Default)]
pub struct EventDraft {
    pub name: String,
    pub event_type: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub venue: String,
    pub description: Option<String>,
    pub attendee_count: Option<u32>,
    pub assigned_manager_id: Option<ManagerId>,
}

impl EventDraft {
    /// Check the form and turn it into a brand new `pending` event with a random id.
    ///
    /// `today` is the first allowed date.
    pub fn validate(self, today: NaiveDate) -> Result<Event, DeskError> {
        let name = required(&self.name, "event name")?;
        let event_type = required(&self.event_type, "event type")?;
        let venue = required(&self.venue, "venue")?;
        let date = self.date.ok_or_else(|| DeskError::validation("Please fill in the event date"))?;
        if date < today {
            return Err(DeskError::validation(format!("The event date ({}) cannot be in the past", date)));
        }
        if self.attendee_count == Some(0) {
            return Err(DeskError::validation("The attendee count must be at least 1"));
        }

        let description = self.description
            .map(|d| d.trim().to_string())
            .filter(|d| d.is_empty() == false);

        Ok(Event {
            id: EventId::random(),
            name,
            event_type: EventType::from(event_type),
            date,
            time: self.time,
            venue,
            status: EventStatus::Pending,
            description,
            attendee_count: self.attendee_count,
            assigned_manager_id: self.assigned_manager_id,
        })
    }
}

/// A partial edit of an event. `None` leaves a field untouched; `Some(None)` clears an optional field.
#[derive(Clone, Debug, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub event_type: Option<EventType>,
    pub date: Option<NaiveDate>,
    pub time: Option<Option<NaiveTime>>,
    pub venue: Option<String>,
    pub description: Option<Option<String>>,
    pub attendee_count: Option<Option<u32>>,
    pub assigned_manager_id: Option<Option<ManagerId>>,
}

pub(crate) fn required(value: &str, field: &str) -> Result<String, DeskError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeskError::validation(format!("Please fill in the {}", field)));
    }
    Ok(trimmed.to_string())
}

/// Clock times are `HH:MM` on the wire
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, FORMAT)
                // the service may append seconds
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
