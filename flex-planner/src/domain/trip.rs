//! Trip metadata.

use std::sync::Arc;

use super::{FeedScopedId, ServiceCalendar, ServiceDate};

/// Identity and service metadata of a trip.
///
/// Flexible trips reference this through an `Arc`: they read the id and
/// calendar but never own or modify the transit data it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    /// Feed-scoped trip id
    pub id: FeedScopedId,
    /// Route the trip belongs to
    pub route_id: FeedScopedId,
    /// Headsign shown to riders
    pub headsign: Option<String>,
    /// Whether the vehicle is wheelchair accessible
    pub wheelchair_accessible: bool,
    /// Dates the trip runs on
    pub calendar: Arc<ServiceCalendar>,
}

impl Trip {
    /// Create trip metadata with no headsign.
    pub fn new(id: FeedScopedId, route_id: FeedScopedId, calendar: Arc<ServiceCalendar>) -> Self {
        Self {
            id,
            route_id,
            headsign: None,
            wheelchair_accessible: false,
            calendar,
        }
    }

    /// Check whether the trip runs on a service date.
    pub fn runs_on(&self, date: ServiceDate) -> bool {
        self.calendar.is_active(date)
    }
}
