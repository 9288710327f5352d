//! What the dashboard shows: filtered, grouped and paginated events

use std::str::FromStr;

use chrono::NaiveDate;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::error::DeskError;
use crate::event::{Event, EventStatus};

/// Status part of a query
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(EventStatus),
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl FromStr for StatusFilter {
    type Err = DeskError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            other => other.parse().map(Self::Only),
        }
    }
}

/// The search fields above the event table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQuery {
    /// Case-insensitive substring of the event name, trimmed. A blank search (e.g. only spaces) matches every event
    pub search: String,
    pub status: StatusFilter,
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub date_to: Option<NaiveDate>,
}

impl EventQuery {
    pub fn matches(&self, event: &Event) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() == false && event.name.to_lowercase().contains(&needle) == false {
            return false;
        }
        if let StatusFilter::Only(status) = self.status {
            if event.status != status {
                return false;
            }
        }
        if let Some(from) = self.date_from {
            if event.date < from {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if event.date > to {
                return false;
            }
        }
        true
    }

    /// Returns the matching events, in their original order
    pub fn filter<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter()
            .filter(|e| self.matches(e))
            .collect()
    }
}

/// A page of the "upcoming" group
#[derive(Clone, Debug, PartialEq)]
pub struct Page<'a> {
    /// 1-based number of this page, once clamped to the existing pages
    pub number: usize,
    pub total_pages: usize,
    /// Number of events in the whole group
    pub total_items: usize,
    pub items: Vec<&'a Event>,
}

impl<'a> Page<'a> {
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// The groups of events the dashboard displays
#[derive(Clone, Debug, PartialEq)]
pub struct Projection<'a> {
    /// Filtered events that are `in-progress`
    pub ongoing: Vec<&'a Event>,
    /// Filtered events that are not deleted
    pub upcoming: Vec<&'a Event>,
    /// Filtered events that are deleted
    pub deleted: Vec<&'a Event>,
    /// The requested page of `upcoming`
    pub page: Page<'a>,
}

/// The state of the event table: its query, and which page is shown.
///
/// Changing any part of the query goes back to the first page.
#[derive(Clone, Debug, PartialEq)]
pub struct EventView {
    query: EventQuery,
    page: usize,
    page_size: usize,
}

impl Default for EventView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl EventView {
    /// A page size of 0 is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            query: EventQuery::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn query(&self) -> &EventQuery { &self.query }
    /// The requested page. See [`Page::number`] for the one actually shown
    pub fn page(&self) -> usize { self.page }
    pub fn page_size(&self) -> usize { self.page_size }

    pub fn set_search<S: Into<String>>(&mut self, search: S) {
        self.query.search = search.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.query.status = status;
        self.page = 1;
    }

    pub fn set_date_from(&mut self, date: Option<NaiveDate>) {
        self.query.date_from = date;
        self.page = 1;
    }

    pub fn set_date_to(&mut self, date: Option<NaiveDate>) {
        self.query.date_to = date;
        self.page = 1;
    }

    pub fn set_query(&mut self, query: EventQuery) {
        self.query = query;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    pub fn project<'a>(&self, events: &'a [Event]) -> Projection<'a> {
        let filtered = self.query.filter(events);

        let ongoing: Vec<&Event> = filtered.iter()
            .copied()
            .filter(|e| e.status == EventStatus::InProgress)
            .collect();
        let (deleted, upcoming): (Vec<&Event>, Vec<&Event>) = filtered.iter()
            .copied()
            .partition(|e| e.is_deleted());

        let page = paginate(&upcoming, self.page, self.page_size);
        Projection { ongoing, upcoming, deleted, page }
    }
}

fn paginate<'a>(items: &[&'a Event], requested: usize, page_size: usize) -> Page<'a> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = (total_items + page_size - 1) / page_size;
    let number = requested.max(1).min(total_pages.max(1));

    let start = (number - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let items = if start < end { items[start..end].to_vec() } else { Vec::new() };

    Page { number, total_pages, total_items, items }
}

/// Counters shown on the admin dashboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    /// Events that are not deleted
    pub total: usize,
    pub completed: usize,
}

impl DashboardStats {
    pub fn from_events(events: &[Event]) -> Self {
        let live = events.iter().filter(|e| e.is_deleted() == false);
        let mut stats = Self::default();
        for event in live {
            stats.total += 1;
            if event.status == EventStatus::Completed {
                stats.completed += 1;
            }
        }
        stats
    }
}
