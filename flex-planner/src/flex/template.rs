//! Access and egress templates.
//!
//! A template is one way of using a flexible trip to get from the street
//! network onto the rest of the journey (access), or off it at the end
//! (egress). Templates are produced lazily, one boarding/alighting pair at
//! a time, so a search that has seen enough can stop early.

use std::sync::Arc;

use crate::domain::{ServiceDate, ServiceTime, StopLocation};

use super::{DistanceCalculator, FlexPath, FlexTrip, StopIndex};

/// A stop reached through the street network, with the walk to get there.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyStop {
    /// The stop reached
    pub stop: Arc<StopLocation>,
    /// Walking distance in meters
    pub distance_meters: f64,
    /// Walking time in seconds
    pub duration_seconds: i32,
}

impl NearbyStop {
    /// Create a nearby stop with its walk.
    pub fn new(stop: Arc<StopLocation>, distance_meters: f64, duration_seconds: i32) -> Self {
        Self {
            stop,
            distance_meters,
            duration_seconds,
        }
    }

    /// A stop the rider is already at.
    pub fn at(stop: Arc<StopLocation>) -> Self {
        Self::new(stop, 0.0, 0)
    }
}

/// One way to start a journey with a flexible ride.
///
/// The rider walks to `access`, boards the trip at `board`, and rides to
/// the transfer stop at `alight`, where the rest of the search takes over.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexAccessTemplate {
    trip: Arc<FlexTrip>,
    board: StopIndex,
    alight: StopIndex,
    access: NearbyStop,
    transfer: Arc<StopLocation>,
    path: FlexPath,
    date: ServiceDate,
    time_offset: i32,
    departure: ServiceTime,
}

impl FlexAccessTemplate {
    /// Returns the flexible trip ridden.
    pub fn trip(&self) -> &Arc<FlexTrip> {
        &self.trip
    }

    /// Returns the boarding stop index.
    pub fn board_index(&self) -> StopIndex {
        self.board
    }

    /// Returns the alighting stop index.
    pub fn alight_index(&self) -> StopIndex {
        self.alight
    }

    /// Returns the street leg to the boarding stop.
    pub fn access(&self) -> &NearbyStop {
        &self.access
    }

    /// Returns the stop where the rider leaves the flexible trip.
    pub fn transfer_stop(&self) -> &Arc<StopLocation> {
        &self.transfer
    }

    /// Returns the estimated flexible ride.
    pub fn flex_path(&self) -> FlexPath {
        self.path
    }

    /// Returns the service date the trip times refer to.
    pub fn service_date(&self) -> ServiceDate {
        self.date
    }

    /// Seconds from the search's reference time to midnight of the service date.
    pub fn time_offset(&self) -> i32 {
        self.time_offset
    }

    /// Earliest departure from the boarding stop, in trip time.
    pub fn departure_time(&self) -> ServiceTime {
        self.departure
    }

    /// Earliest departure from the boarding stop, in seconds after the
    /// search's reference time.
    pub fn departure_search_time(&self) -> i64 {
        i64::from(self.departure.seconds()) + i64::from(self.time_offset)
    }

    /// Earliest arrival at the transfer stop, in seconds after the search's
    /// reference time, assuming the ride starts at the earliest departure.
    pub fn arrival_search_time(&self) -> i64 {
        self.departure_search_time() + i64::from(self.path.duration_seconds)
    }

    /// Re-evaluate the departure for a rider ready at `requested` (trip time).
    pub fn earliest_departure_at(&self, requested: ServiceTime) -> Option<ServiceTime> {
        self.trip
            .earliest_departure_time(requested, self.board, self.alight, self.path.duration_seconds)
    }
}

/// One way to end a journey with a flexible ride.
///
/// The rider boards at `board`, rides to `alight` which serves `egress`,
/// and walks from there to the destination.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexEgressTemplate {
    trip: Arc<FlexTrip>,
    board: StopIndex,
    alight: StopIndex,
    egress: NearbyStop,
    transfer: Arc<StopLocation>,
    path: FlexPath,
    date: ServiceDate,
    time_offset: i32,
    arrival: ServiceTime,
}

impl FlexEgressTemplate {
    /// Returns the flexible trip ridden.
    pub fn trip(&self) -> &Arc<FlexTrip> {
        &self.trip
    }

    /// Returns the boarding stop index.
    pub fn board_index(&self) -> StopIndex {
        self.board
    }

    /// Returns the alighting stop index.
    pub fn alight_index(&self) -> StopIndex {
        self.alight
    }

    /// Returns the street leg from the alighting stop.
    pub fn egress(&self) -> &NearbyStop {
        &self.egress
    }

    /// Returns the stop where the rider joins the flexible trip.
    pub fn transfer_stop(&self) -> &Arc<StopLocation> {
        &self.transfer
    }

    /// Returns the estimated flexible ride.
    pub fn flex_path(&self) -> FlexPath {
        self.path
    }

    /// Returns the service date the trip times refer to.
    pub fn service_date(&self) -> ServiceDate {
        self.date
    }

    /// Seconds from the search's reference time to midnight of the service date.
    pub fn time_offset(&self) -> i32 {
        self.time_offset
    }

    /// Latest arrival at the alighting stop, in trip time.
    pub fn arrival_time(&self) -> ServiceTime {
        self.arrival
    }

    /// Latest arrival at the alighting stop, in seconds after the search's
    /// reference time (negative: before it).
    pub fn arrival_search_time(&self) -> i64 {
        i64::from(self.arrival.seconds()) + i64::from(self.time_offset)
    }

    /// Latest departure from the transfer stop, in seconds after the
    /// search's reference time, assuming the ride ends at the latest arrival.
    pub fn departure_search_time(&self) -> i64 {
        self.arrival_search_time() - i64::from(self.path.duration_seconds)
    }

    /// Re-evaluate the arrival for a rider who must arrive by `requested` (trip time).
    pub fn latest_arrival_at(&self, requested: ServiceTime) -> Option<ServiceTime> {
        self.trip
            .latest_arrival_time(requested, self.board, self.alight, self.path.duration_seconds)
    }
}

/// Lazy sequence of [`FlexAccessTemplate`]s for one trip and nearby stop.
#[derive(Clone)]
pub struct FlexAccessTemplates<'a> {
    trip: Arc<FlexTrip>,
    access: NearbyStop,
    time_offset: i32,
    date: ServiceDate,
    calculator: &'a dyn DistanceCalculator,
    // Trip time at which the rider reaches the boarding stop
    ready: ServiceTime,
    board: StopIndex,
    alight: StopIndex,
}

impl<'a> FlexAccessTemplates<'a> {
    pub(super) fn new(
        trip: Arc<FlexTrip>,
        access: NearbyStop,
        time_offset: i32,
        date: ServiceDate,
        calculator: &'a dyn DistanceCalculator,
    ) -> Self {
        let board = if trip.runs_on(date) {
            StopIndex(0)
        } else {
            StopIndex(trip.stop_count())
        };
        let ready = ServiceTime::MIDNIGHT
            .saturating_add_secs(access.duration_seconds)
            .saturating_sub_secs(time_offset);

        Self {
            trip,
            access,
            time_offset,
            date,
            calculator,
            ready,
            board,
            alight: board.next(),
        }
    }

    fn boards_here(&self, index: StopIndex) -> bool {
        self.trip.can_board(index)
            && self
                .trip
                .stop(index)
                .is_some_and(|stop| stop.serves(&self.access.stop))
    }

    fn template(&self, board: StopIndex, alight: StopIndex) -> Option<FlexAccessTemplate> {
        let from = self.trip.stop(board)?;
        let to = self.trip.stop(alight)?;
        let path = self.calculator.calculate(from.point, to.point)?;
        let departure =
            self.trip
                .earliest_departure_time(self.ready, board, alight, path.duration_seconds)?;

        Some(FlexAccessTemplate {
            trip: Arc::clone(&self.trip),
            board,
            alight,
            access: self.access.clone(),
            transfer: Arc::clone(to),
            path,
            date: self.date,
            time_offset: self.time_offset,
            departure,
        })
    }
}

impl Iterator for FlexAccessTemplates<'_> {
    type Item = FlexAccessTemplate;

    fn next(&mut self) -> Option<Self::Item> {
        let count = self.trip.stop_count();
        loop {
            if self.board.0 >= count {
                return None;
            }
            if self.alight.0 >= count || !self.boards_here(self.board) {
                self.board = self.board.next();
                self.alight = self.board.next();
                continue;
            }

            let (board, alight) = (self.board, self.alight);
            self.alight = alight.next();
            if !self.trip.can_alight(alight) {
                continue;
            }
            if let Some(template) = self.template(board, alight) {
                return Some(template);
            }
        }
    }
}

/// Lazy sequence of [`FlexEgressTemplate`]s for one trip and nearby stop.
#[derive(Clone)]
pub struct FlexEgressTemplates<'a> {
    trip: Arc<FlexTrip>,
    egress: NearbyStop,
    time_offset: i32,
    date: ServiceDate,
    calculator: &'a dyn DistanceCalculator,
    // Trip time by which the rider must leave the alighting stop
    deadline: ServiceTime,
    alight: StopIndex,
    board: StopIndex,
}

impl<'a> FlexEgressTemplates<'a> {
    pub(super) fn new(
        trip: Arc<FlexTrip>,
        egress: NearbyStop,
        time_offset: i32,
        date: ServiceDate,
        calculator: &'a dyn DistanceCalculator,
    ) -> Self {
        let alight = if trip.runs_on(date) {
            StopIndex(1)
        } else {
            StopIndex(trip.stop_count())
        };
        let deadline = ServiceTime::MIDNIGHT
            .saturating_sub_secs(egress.duration_seconds)
            .saturating_sub_secs(time_offset);

        Self {
            trip,
            egress,
            time_offset,
            date,
            calculator,
            deadline,
            alight,
            board: StopIndex(0),
        }
    }

    fn alights_here(&self, index: StopIndex) -> bool {
        self.trip.can_alight(index)
            && self
                .trip
                .stop(index)
                .is_some_and(|stop| stop.serves(&self.egress.stop))
    }

    fn template(&self, board: StopIndex, alight: StopIndex) -> Option<FlexEgressTemplate> {
        let from = self.trip.stop(board)?;
        let to = self.trip.stop(alight)?;
        let path = self.calculator.calculate(from.point, to.point)?;
        let arrival =
            self.trip
                .latest_arrival_time(self.deadline, board, alight, path.duration_seconds)?;

        Some(FlexEgressTemplate {
            trip: Arc::clone(&self.trip),
            board,
            alight,
            egress: self.egress.clone(),
            transfer: Arc::clone(from),
            path,
            date: self.date,
            time_offset: self.time_offset,
            arrival,
        })
    }
}

impl Iterator for FlexEgressTemplates<'_> {
    type Item = FlexEgressTemplate;

    fn next(&mut self) -> Option<Self::Item> {
        let count = self.trip.stop_count();
        loop {
            if self.alight.0 >= count {
                return None;
            }
            if self.board >= self.alight || !self.alights_here(self.alight) {
                self.alight = self.alight.next();
                self.board = StopIndex(0);
                continue;
            }

            let (board, alight) = (self.board, self.alight);
            self.board = board.next();
            if !self.trip.can_board(board) {
                continue;
            }
            if let Some(template) = self.template(board, alight) {
                return Some(template);
            }
        }
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
