//! Service calendars: which dates a trip runs on.

use std::collections::BTreeSet;

use chrono::Weekday;

use super::{FeedScopedId, ServiceDate};

/// A GTFS-style service calendar.
///
/// A weekly pattern applies between `start` and `end` (inclusive), then
/// explicit exceptions add or remove individual dates. Removals win over
/// additions for the same date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCalendar {
    /// Service id referenced by trips
    pub id: FeedScopedId,
    /// Days of the week the pattern runs, Monday first
    pub weekdays: [bool; 7],
    /// First date of the weekly pattern
    pub start: ServiceDate,
    /// Last date of the weekly pattern
    pub end: ServiceDate,
    /// Dates added outside the weekly pattern
    pub added: BTreeSet<ServiceDate>,
    /// Dates removed from the weekly pattern
    pub removed: BTreeSet<ServiceDate>,
}

impl ServiceCalendar {
    /// Create a calendar running on the given weekdays between two dates.
    pub fn weekly(
        id: FeedScopedId,
        weekdays: [bool; 7],
        start: ServiceDate,
        end: ServiceDate,
    ) -> Self {
        Self {
            id,
            weekdays,
            start,
            end,
            added: BTreeSet::new(),
            removed: BTreeSet::new(),
        }
    }

    /// Create a calendar running every day between two dates.
    pub fn daily(id: FeedScopedId, start: ServiceDate, end: ServiceDate) -> Self {
        Self::weekly(id, [true; 7], start, end)
    }

    /// Add an exception date on which service runs.
    pub fn with_added(mut self, date: ServiceDate) -> Self {
        self.added.insert(date);
        self
    }

    /// Add an exception date on which service does not run.
    pub fn with_removed(mut self, date: ServiceDate) -> Self {
        self.removed.insert(date);
        self
    }

    /// Check whether service runs on a date.
    pub fn is_active(&self, date: ServiceDate) -> bool {
        if self.removed.contains(&date) {
            return false;
        }
        if self.added.contains(&date) {
            return true;
        }
        date >= self.start && date <= self.end && self.runs_on_weekday(date.weekday())
    }

    fn runs_on_weekday(&self, weekday: Weekday) -> bool {
        self.weekdays[weekday.num_days_from_monday() as usize]
    }
}
