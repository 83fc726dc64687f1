//! Demand-responsive trips without a timetable.
//!
//! Each stop (usually a zone) is served within a pickup/drop-off window.
//! The vehicle goes wherever it is booked to go, so the only timing rules
//! are the windows and an optional cap on how long a ride may take.

use std::sync::Arc;

use crate::domain::{ServiceTime, StopLocation, Trip};

use super::{FlexTripError, StopIndex};

/// One stop of an unscheduled trip, with its service window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStopTime {
    /// Stop or zone served
    pub stop: Arc<StopLocation>,
    /// Start of the pickup/drop-off window
    pub window_start: ServiceTime,
    /// End of the pickup/drop-off window
    pub window_end: ServiceTime,
    /// Whether riders may board here
    pub can_board: bool,
    /// Whether riders may alight here
    pub can_alight: bool,
}

impl WindowStopTime {
    /// A stop served between `start` and `end`, allowing boarding and alighting.
    pub fn new(stop: Arc<StopLocation>, start: ServiceTime, end: ServiceTime) -> Self {
        Self {
            stop,
            window_start: start,
            window_end: end,
            can_board: true,
            can_alight: true,
        }
    }

    /// Allow or forbid boarding.
    pub fn with_boarding(mut self, allowed: bool) -> Self {
        self.can_board = allowed;
        self
    }

    /// Allow or forbid alighting.
    pub fn with_alighting(mut self, allowed: bool) -> Self {
        self.can_alight = allowed;
        self
    }
}

/// A demand-responsive trip defined by service windows.
///
/// # Invariants
///
/// - At least two stops
/// - Every window has `start <= end`
/// - The maximum ride duration, if any, is not negative
#[derive(Debug, Clone, PartialEq)]
pub struct UnscheduledTrip {
    trip: Arc<Trip>,
    stop_times: Vec<WindowStopTime>,
    max_ride_seconds: Option<i32>,
}

impl UnscheduledTrip {
    /// Build a trip from its stop windows.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are fewer than two stops or a window is
    /// inverted.
    pub fn new(trip: Arc<Trip>, stop_times: Vec<WindowStopTime>) -> Result<Self, FlexTripError> {
        if stop_times.len() < 2 {
            return Err(FlexTripError::TooFewStops(stop_times.len()));
        }
        if let Some(i) = stop_times
            .iter()
            .position(|st| st.window_start > st.window_end)
        {
            return Err(FlexTripError::InvertedWindow(StopIndex(i)));
        }

        Ok(Self {
            trip,
            stop_times,
            max_ride_seconds: None,
        })
    }

    /// Limit how long a single ride may take.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `seconds` is negative.
    pub fn with_max_ride(mut self, seconds: i32) -> Result<Self, FlexTripError> {
        if seconds < 0 {
            return Err(FlexTripError::NegativeMaxRide(seconds));
        }
        self.max_ride_seconds = Some(seconds);
        Ok(self)
    }

    /// Returns the trip metadata.
    pub fn trip(&self) -> &Arc<Trip> {
        &self.trip
    }

    /// Returns the stop times in trip order.
    pub fn stop_times(&self) -> &[WindowStopTime] {
        &self.stop_times
    }

    /// Returns the ride duration cap in seconds, if any.
    pub fn max_ride_seconds(&self) -> Option<i32> {
        self.max_ride_seconds
    }

    fn windows(
        &self,
        from: StopIndex,
        to: StopIndex,
        flex_time: i32,
    ) -> Option<(&WindowStopTime, &WindowStopTime)> {
        if from >= to {
            return None;
        }
        if self.max_ride_seconds.is_some_and(|max| flex_time > max) {
            return None;
        }
        Some((self.stop_times.get(from.0)?, self.stop_times.get(to.0)?))
    }

    /// Earliest time the rider can be picked up at `from`, having reached
    /// it at `requested`, for a ride of `flex_time` seconds to `to`.
    ///
    /// The rider boards once both they and the window are ready, and must
    /// still be dropped off before the window at `to` closes.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use flex_planner::domain::{FeedScopedId, ServiceCalendar, ServiceDate, ServiceTime, StopLocation, Trip};
    /// use flex_planner::flex::{StopIndex, UnscheduledTrip, WindowStopTime};
    ///
    /// let id = |s: &str| FeedScopedId::new("demo", s);
    /// let start = ServiceDate::from_ymd(2024, 1, 1).unwrap();
    /// let end = ServiceDate::from_ymd(2024, 12, 31).unwrap();
    /// let calendar = Arc::new(ServiceCalendar::daily(id("all"), start, end));
    /// let trip = Arc::new(Trip::new(id("t1"), id("r1"), calendar));
    /// let stop = |s: &str| Arc::new(StopLocation::point(id(s), s, 40.0, -74.0));
    /// let time = |s: &str| ServiceTime::parse(s).unwrap();
    ///
    /// let dial_a_ride = UnscheduledTrip::new(
    ///     trip,
    ///     vec![
    ///         WindowStopTime::new(stop("a"), time("08:00"), time("10:00")),
    ///         WindowStopTime::new(stop("b"), time("08:00"), time("10:00")),
    ///     ],
    /// )
    /// .unwrap();
    ///
    /// let (a, b) = (StopIndex(0), StopIndex(1));
    /// // Too early: wait for the window to open
    /// assert_eq!(dial_a_ride.earliest_departure_time(time("07:00"), a, b, 600), Some(time("08:00")));
    /// // Too late: the ride would end after the window at b closes
    /// assert_eq!(dial_a_ride.earliest_departure_time(time("09:55"), a, b, 600), None);
    /// ```
    pub fn earliest_departure_time(
        &self,
        requested: ServiceTime,
        from: StopIndex,
        to: StopIndex,
        flex_time: i32,
    ) -> Option<ServiceTime> {
        let (board, alight) = self.windows(from, to, flex_time)?;

        let departure = requested.max(board.window_start);
        if departure > board.window_end {
            return None;
        }
        let arrival = departure.saturating_add_secs(flex_time).max(alight.window_start);
        (arrival <= alight.window_end).then_some(departure)
    }

    /// Latest time the rider can be dropped off at `to`, needing to be
    /// there by `requested`, for a ride of `flex_time` seconds from `from`.
    pub fn latest_arrival_time(
        &self,
        requested: ServiceTime,
        from: StopIndex,
        to: StopIndex,
        flex_time: i32,
    ) -> Option<ServiceTime> {
        let (board, alight) = self.windows(from, to, flex_time)?;

        let arrival = requested.min(alight.window_end);
        if arrival < alight.window_start {
            return None;
        }
        let departure = arrival.saturating_sub_secs(flex_time).min(board.window_end);
        (departure >= board.window_start).then_some(arrival)
    }
}
