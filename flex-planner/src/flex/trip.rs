//! The closed set of flexible trip kinds.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::domain::{FeedScopedId, ServiceDate, ServiceTime, StopLocation, Trip};

use super::template::{FlexAccessTemplates, FlexEgressTemplates, NearbyStop};
use super::{DistanceCalculator, ScheduledDeviatedTrip, UnscheduledTrip};

/// Position of a stop within a flexible trip.
///
/// Used instead of a stop id because a trip may visit the same zone more
/// than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopIndex(pub usize);

impl StopIndex {
    /// Returns the next index.
    pub fn next(self) -> Self {
        StopIndex(self.0 + 1)
    }
}

impl fmt::Display for StopIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A flexible trip of any supported kind.
///
/// Built once when transit data is loaded and shared as `Arc<FlexTrip>`
/// by every search. All kinds answer the same questions: which stops they
/// serve, and when a rider can be picked up or dropped off.
#[derive(Debug, Clone, PartialEq)]
pub enum FlexTrip {
    /// Fixed route with published times that deviates into zones
    ScheduledDeviated(ScheduledDeviatedTrip),
    /// Demand-responsive service within time windows
    Unscheduled(UnscheduledTrip),
}

impl From<ScheduledDeviatedTrip> for FlexTrip {
    fn from(trip: ScheduledDeviatedTrip) -> Self {
        FlexTrip::ScheduledDeviated(trip)
    }
}

impl From<UnscheduledTrip> for FlexTrip {
    fn from(trip: UnscheduledTrip) -> Self {
        FlexTrip::Unscheduled(trip)
    }
}

impl FlexTrip {
    /// Returns the trip metadata.
    pub fn trip(&self) -> &Arc<Trip> {
        match self {
            FlexTrip::ScheduledDeviated(t) => t.trip(),
            FlexTrip::Unscheduled(t) => t.trip(),
        }
    }

    /// Returns the trip id.
    pub fn id(&self) -> &FeedScopedId {
        &self.trip().id
    }

    /// Short name of the trip kind.
    pub fn kind(&self) -> &'static str {
        match self {
            FlexTrip::ScheduledDeviated(_) => "scheduled_deviated",
            FlexTrip::Unscheduled(_) => "unscheduled",
        }
    }

    /// Returns the number of stops.
    pub fn stop_count(&self) -> usize {
        match self {
            FlexTrip::ScheduledDeviated(t) => t.stop_times().len(),
            FlexTrip::Unscheduled(t) => t.stop_times().len(),
        }
    }

    /// Returns the stop at `index`.
    pub fn stop(&self, index: StopIndex) -> Option<&Arc<StopLocation>> {
        match self {
            FlexTrip::ScheduledDeviated(t) => t.stop_times().get(index.0).map(|st| &st.stop),
            FlexTrip::Unscheduled(t) => t.stop_times().get(index.0).map(|st| &st.stop),
        }
    }

    /// Whether riders may board at `index`.
    pub fn can_board(&self, index: StopIndex) -> bool {
        match self {
            FlexTrip::ScheduledDeviated(t) => t.stop_times().get(index.0).is_some_and(|st| st.can_board),
            FlexTrip::Unscheduled(t) => t.stop_times().get(index.0).is_some_and(|st| st.can_board),
        }
    }

    /// Whether riders may alight at `index`.
    pub fn can_alight(&self, index: StopIndex) -> bool {
        match self {
            FlexTrip::ScheduledDeviated(t) => t.stop_times().get(index.0).is_some_and(|st| st.can_alight),
            FlexTrip::Unscheduled(t) => t.stop_times().get(index.0).is_some_and(|st| st.can_alight),
        }
    }

    /// Check whether the trip runs on a service date.
    pub fn runs_on(&self, date: ServiceDate) -> bool {
        self.trip().runs_on(date)
    }

    /// The distinct stops a rider can board or alight at, in trip order.
    pub fn stops(&self) -> Vec<&Arc<StopLocation>> {
        let mut seen: HashSet<&FeedScopedId> = HashSet::new();
        let mut stops = Vec::new();
        for i in (0..self.stop_count()).map(StopIndex) {
            if !(self.can_board(i) || self.can_alight(i)) {
                continue;
            }
            if let Some(stop) = self.stop(i) {
                if seen.insert(&stop.id) {
                    stops.push(stop);
                }
            }
        }
        stops
    }

    /// Earliest departure from `from` for a rider ready at `requested`,
    /// riding `flex_time` seconds to `to`.
    ///
    /// `None` when no departure is possible; a later `requested` never
    /// gives an earlier answer.
    pub fn earliest_departure_time(
        &self,
        requested: ServiceTime,
        from: StopIndex,
        to: StopIndex,
        flex_time: i32,
    ) -> Option<ServiceTime> {
        match self {
            FlexTrip::ScheduledDeviated(t) => t.earliest_departure_time(requested, from, to, flex_time),
            FlexTrip::Unscheduled(t) => t.earliest_departure_time(requested, from, to, flex_time),
        }
    }

    /// Latest arrival at `to` for a rider who must be there by `requested`,
    /// having ridden `flex_time` seconds from `from`.
    ///
    /// `None` when no arrival is possible; an earlier `requested` never
    /// gives a later answer.
    pub fn latest_arrival_time(
        &self,
        requested: ServiceTime,
        from: StopIndex,
        to: StopIndex,
        flex_time: i32,
    ) -> Option<ServiceTime> {
        match self {
            FlexTrip::ScheduledDeviated(t) => t.latest_arrival_time(requested, from, to, flex_time),
            FlexTrip::Unscheduled(t) => t.latest_arrival_time(requested, from, to, flex_time),
        }
    }

    /// Ways to start a journey on this trip from `nearby`.
    ///
    /// `time_offset` is the number of seconds from the search's departure
    /// time to midnight of `date`; the rider is taken to leave the origin
    /// at the departure time and reach `nearby` after walking to it.
    ///
    /// The iterator is lazy and can be abandoned at any point. Calling this
    /// again yields the same templates.
    pub fn flex_access_templates<'a>(
        self: &Arc<Self>,
        nearby: &NearbyStop,
        time_offset: i32,
        date: ServiceDate,
        calculator: &'a dyn DistanceCalculator,
    ) -> FlexAccessTemplates<'a> {
        FlexAccessTemplates::new(Arc::clone(self), nearby.clone(), time_offset, date, calculator)
    }

    /// Ways to end a journey on this trip at `nearby`.
    ///
    /// `time_offset` is the number of seconds from the search's arrival
    /// deadline to midnight of `date`; the rider must leave `nearby` early
    /// enough to walk to the destination by the deadline.
    pub fn flex_egress_templates<'a>(
        self: &Arc<Self>,
        nearby: &NearbyStop,
        time_offset: i32,
        date: ServiceDate,
        calculator: &'a dyn DistanceCalculator,
    ) -> FlexEgressTemplates<'a> {
        FlexEgressTemplates::new(Arc::clone(self), nearby.clone(), time_offset, date, calculator)
    }
}
