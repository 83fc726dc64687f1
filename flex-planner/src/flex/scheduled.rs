//! Deviated-route trips that follow a published timetable.
//!
//! The vehicle runs a fixed route with scheduled times at its fixed stops
//! but may leave the route to serve riders inside a zone. Zone stops
//! usually carry no time of their own; they take the time of the
//! neighbouring scheduled stop.

use std::sync::Arc;

use crate::domain::{ServiceTime, StopLocation, Trip};

use super::{FlexTripError, StopIndex};

/// One stop of a scheduled deviated-route trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledStopTime {
    /// Stop or zone served
    pub stop: Arc<StopLocation>,
    /// Scheduled arrival, if published
    pub arrival: Option<ServiceTime>,
    /// Scheduled departure, if published
    pub departure: Option<ServiceTime>,
    /// Whether riders may board here
    pub can_board: bool,
    /// Whether riders may alight here
    pub can_alight: bool,
}

impl ScheduledStopTime {
    /// A stop with the given times where boarding and alighting are allowed.
    pub fn new(
        stop: Arc<StopLocation>,
        arrival: Option<ServiceTime>,
        departure: Option<ServiceTime>,
    ) -> Self {
        Self {
            stop,
            arrival,
            departure,
            can_board: true,
            can_alight: true,
        }
    }

    /// A stop where the vehicle arrives and departs at `time`.
    pub fn at(stop: Arc<StopLocation>, time: ServiceTime) -> Self {
        Self::new(stop, Some(time), Some(time))
    }

    /// A stop without published times.
    pub fn untimed(stop: Arc<StopLocation>) -> Self {
        Self::new(stop, None, None)
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

/// A flexible trip whose times come from a published schedule.
///
/// # Invariants
///
/// - At least two stops
/// - At least one published time
/// - Published times never go backwards along the trip
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use flex_planner::domain::{FeedScopedId, ServiceCalendar, ServiceDate, ServiceTime, StopLocation, Trip};
/// use flex_planner::flex::{ScheduledDeviatedTrip, ScheduledStopTime, StopIndex};
///
/// let id = |s: &str| FeedScopedId::new("demo", s);
/// let start = ServiceDate::from_ymd(2024, 1, 1).unwrap();
/// let end = ServiceDate::from_ymd(2024, 12, 31).unwrap();
/// let calendar = Arc::new(ServiceCalendar::daily(id("all"), start, end));
/// let trip = Arc::new(Trip::new(id("t1"), id("r1"), calendar));
/// let stop = |s: &str| Arc::new(StopLocation::point(id(s), s, 40.0, -74.0));
/// let time = |s: &str| ServiceTime::parse(s).unwrap();
///
/// let scheduled = ScheduledDeviatedTrip::new(
///     trip,
///     vec![
///         ScheduledStopTime::at(stop("a"), time("08:00")),
///         ScheduledStopTime::untimed(stop("zone")),
///         ScheduledStopTime::at(stop("b"), time("08:30")),
///     ],
/// )
/// .unwrap();
///
/// // The zone has no time of its own and takes the departure from "a"
/// assert_eq!(scheduled.departure_time(StopIndex(1)), Some(time("08:00")));
/// // ...and the arrival at "b"
/// assert_eq!(scheduled.arrival_time(StopIndex(1)), Some(time("08:30")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledDeviatedTrip {
    trip: Arc<Trip>,
    stop_times: Vec<ScheduledStopTime>,
    // Departure usable at each stop, falling back to earlier stops
    departures: Vec<Option<ServiceTime>>,
    // Arrival usable at each stop, falling forward to later stops
    arrivals: Vec<Option<ServiceTime>>,
}

impl ScheduledDeviatedTrip {
    /// Build a trip, resolving the times of untimed stops.
    ///
    /// A stop with only one of arrival and departure uses it for both.
    ///
    /// # Errors
    ///
    /// Returns `Err` if there are fewer than two stops, no times at all,
    /// or times that go backwards.
    pub fn new(trip: Arc<Trip>, stop_times: Vec<ScheduledStopTime>) -> Result<Self, FlexTripError> {
        if stop_times.len() < 2 {
            return Err(FlexTripError::TooFewStops(stop_times.len()));
        }

        let mut last: Option<ServiceTime> = None;
        for (i, st) in stop_times.iter().enumerate() {
            for time in [st.arrival, st.departure].into_iter().flatten() {
                if last.is_some_and(|prev| time < prev) {
                    return Err(FlexTripError::TimesNotIncreasing(StopIndex(i)));
                }
                last = Some(time);
            }
        }
        if last.is_none() {
            return Err(FlexTripError::NoTimes);
        }

        let departures = stop_times
            .iter()
            .scan(None, |previous, st| {
                *previous = st.departure.or(st.arrival).or(*previous);
                Some(*previous)
            })
            .collect();

        let mut arrivals: Vec<Option<ServiceTime>> = stop_times
            .iter()
            .rev()
            .scan(None, |following, st| {
                *following = st.arrival.or(st.departure).or(*following);
                Some(*following)
            })
            .collect();
        arrivals.reverse();

        Ok(Self {
            trip,
            stop_times,
            departures,
            arrivals,
        })
    }

    /// Returns the trip metadata.
    pub fn trip(&self) -> &Arc<Trip> {
        &self.trip
    }

    /// Returns the stop times in trip order.
    pub fn stop_times(&self) -> &[ScheduledStopTime] {
        &self.stop_times
    }

    /// Departure time usable when boarding at `index`.
    ///
    /// `None` for an untimed stop with no timed stop before it.
    pub fn departure_time(&self, index: StopIndex) -> Option<ServiceTime> {
        self.departures.get(index.0).copied().flatten()
    }

    /// Arrival time usable when alighting at `index`.
    ///
    /// `None` for an untimed stop with no timed stop after it.
    pub fn arrival_time(&self, index: StopIndex) -> Option<ServiceTime> {
        self.arrivals.get(index.0).copied().flatten()
    }

    /// Scheduled departure from `from`, if it is no earlier than `requested`.
    ///
    /// `flex_time` is not used: the published schedule already allows for
    /// the deviation.
    pub fn earliest_departure_time(
        &self,
        requested: ServiceTime,
        from: StopIndex,
        to: StopIndex,
        _flex_time: i32,
    ) -> Option<ServiceTime> {
        if from >= to || to.0 >= self.stop_times.len() {
            return None;
        }
        self.departure_time(from).filter(|&t| t >= requested)
    }

    /// Scheduled arrival at `to`, if it is no later than `requested`.
    pub fn latest_arrival_time(
        &self,
        requested: ServiceTime,
        from: StopIndex,
        to: StopIndex,
        _flex_time: i32,
    ) -> Option<ServiceTime> {
        if from >= to || to.0 >= self.stop_times.len() {
            return None;
        }
        self.arrival_time(to).filter(|&t| t <= requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flex::test_support::{point_stop, t, trip, zone};

    fn deviated() -> ScheduledDeviatedTrip {
        ScheduledDeviatedTrip::new(
            trip("deviated"),
            vec![
                ScheduledStopTime::at(point_stop("a", 40.0, -74.0), t("08:00")),
                ScheduledStopTime::untimed(zone("z", 40.02, -74.0, 0.01)),
                ScheduledStopTime::new(point_stop("b", 40.04, -74.0), Some(t("08:20")), None),
                ScheduledStopTime::at(point_stop("c", 40.06, -74.0), t("08:40")),
            ],
        )
        .unwrap()
    }

    #[test]
    fn untimed_stops_borrow_neighbouring_times() {
        let trip = deviated();
        assert_eq!(trip.departure_time(StopIndex(1)), Some(t("08:00")));
        assert_eq!(trip.arrival_time(StopIndex(1)), Some(t("08:20")));
        // A single published time stands for both
        assert_eq!(trip.departure_time(StopIndex(2)), Some(t("08:20")));
        assert_eq!(trip.arrival_time(StopIndex(2)), Some(t("08:20")));
        assert_eq!(trip.departure_time(StopIndex(9)), None);
    }

    #[test]
    fn leading_and_trailing_untimed_stops() {
        let trip = ScheduledDeviatedTrip::new(
            trip("edges"),
            vec![
                ScheduledStopTime::untimed(zone("z1", 40.0, -74.0, 0.01)),
                ScheduledStopTime::at(point_stop("a", 40.02, -74.0), t("09:00")),
                ScheduledStopTime::untimed(zone("z2", 40.04, -74.0, 0.01)),
            ],
        )
        .unwrap();

        assert_eq!(trip.departure_time(StopIndex(0)), None);
        assert_eq!(trip.arrival_time(StopIndex(0)), Some(t("09:00")));
        assert_eq!(trip.departure_time(StopIndex(2)), Some(t("09:00")));
        assert_eq!(trip.arrival_time(StopIndex(2)), None);

        assert_eq!(
            trip.earliest_departure_time(ServiceTime::MIN, StopIndex(0), StopIndex(1), 0),
            None
        );
        assert_eq!(
            trip.latest_arrival_time(ServiceTime::MAX, StopIndex(1), StopIndex(2), 0),
            None
        );
    }

    #[test]
    fn earliest_departure() {
        let trip = deviated();
        let (from, to) = (StopIndex(1), StopIndex(3));

        assert_eq!(
            trip.earliest_departure_time(t("07:30"), from, to, 600),
            Some(t("08:00"))
        );
        assert_eq!(
            trip.earliest_departure_time(t("08:00"), from, to, 600),
            Some(t("08:00"))
        );
        assert_eq!(trip.earliest_departure_time(t("08:01"), from, to, 600), None);
    }

    #[test]
    fn latest_arrival() {
        let trip = deviated();
        let (from, to) = (StopIndex(0), StopIndex(1));

        assert_eq!(
            trip.latest_arrival_time(t("09:00"), from, to, 600),
            Some(t("08:20"))
        );
        assert_eq!(trip.latest_arrival_time(t("08:19"), from, to, 600), None);
    }

    #[test]
    fn wrong_direction_is_infeasible() {
        let trip = deviated();
        assert_eq!(
            trip.earliest_departure_time(ServiceTime::MIN, StopIndex(2), StopIndex(2), 0),
            None
        );
        assert_eq!(
            trip.latest_arrival_time(ServiceTime::MAX, StopIndex(3), StopIndex(1), 0),
            None
        );
        assert_eq!(
            trip.earliest_departure_time(ServiceTime::MIN, StopIndex(0), StopIndex(4), 0),
            None
        );
    }

    #[test]
    fn rejects_bad_stop_times() {
        let a = point_stop("a", 40.0, -74.0);
        let b = point_stop("b", 40.1, -74.0);

        let err = ScheduledDeviatedTrip::new(trip("x"), vec![ScheduledStopTime::at(a.clone(), t("08:00"))])
            .unwrap_err();
        assert_eq!(err, FlexTripError::TooFewStops(1));

        let err = ScheduledDeviatedTrip::new(
            trip("x"),
            vec![
                ScheduledStopTime::at(a.clone(), t("08:00")),
                ScheduledStopTime::at(b.clone(), t("07:59")),
            ],
        )
        .unwrap_err();
        assert_eq!(err, FlexTripError::TimesNotIncreasing(StopIndex(1)));

        let err = ScheduledDeviatedTrip::new(
            trip("x"),
            vec![
                ScheduledStopTime::new(a.clone(), Some(t("08:10")), Some(t("08:05"))),
                ScheduledStopTime::at(b.clone(), t("08:20")),
            ],
        )
        .unwrap_err();
        assert_eq!(err, FlexTripError::TimesNotIncreasing(StopIndex(0)));

        let err = ScheduledDeviatedTrip::new(
            trip("x"),
            vec![ScheduledStopTime::untimed(a), ScheduledStopTime::untimed(b)],
        )
        .unwrap_err();
        assert_eq!(err, FlexTripError::NoTimes);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// A later request never gets an earlier departure
            #[test]
            fn earliest_departure_non_decreasing(
                a in -100_000i32..200_000,
                b in -100_000i32..200_000,
                from in 0usize..4,
                to in 0usize..4,
            ) {
                let trip = deviated();
                let (lo, hi) = (a.min(b), a.max(b));
                let first = trip.earliest_departure_time(
                    ServiceTime::from_seconds(lo), StopIndex(from), StopIndex(to), 0);
                let second = trip.earliest_departure_time(
                    ServiceTime::from_seconds(hi), StopIndex(from), StopIndex(to), 0);
                match (first, second) {
                    (Some(x), Some(y)) => prop_assert!(x <= y),
                    (None, Some(_)) => prop_assert!(false, "became feasible later"),
                    _ => {}
                }
            }

            /// An earlier deadline never gets a later arrival
            #[test]
            fn latest_arrival_non_increasing(
                a in -100_000i32..200_000,
                b in -100_000i32..200_000,
                from in 0usize..4,
                to in 0usize..4,
            ) {
                let trip = deviated();
                let (lo, hi) = (a.min(b), a.max(b));
                let first = trip.latest_arrival_time(
                    ServiceTime::from_seconds(hi), StopIndex(from), StopIndex(to), 0);
                let second = trip.latest_arrival_time(
                    ServiceTime::from_seconds(lo), StopIndex(from), StopIndex(to), 0);
                match (first, second) {
                    (Some(x), Some(y)) => prop_assert!(x >= y),
                    (None, Some(_)) => prop_assert!(false, "became feasible earlier"),
                    _ => {}
                }
            }
        }
    }
}
