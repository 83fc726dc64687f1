//! The immutable transit data a search runs against.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDateTime;
use geo::{Distance, Haversine, Point};
use tracing::debug;

use crate::domain::{FeedScopedId, ServiceCalendar, ServiceDate, StopLocation};
use crate::flex::{
    DistanceCalculator, FlexAccessTemplate, FlexEgressTemplate, FlexTrip, NearbyStop, StopIndex,
};

use super::DataError;

/// Collects stops, calendars and flexible trips, checking references as
/// trips are added.
///
/// # Examples
///
/// ```
/// use flex_planner::domain::{FeedScopedId, ServiceCalendar, ServiceDate, ServiceTime, StopLocation, Trip};
/// use flex_planner::flex::{UnscheduledTrip, WindowStopTime};
/// use flex_planner::transit::TransitDataBuilder;
///
/// let id = |s: &str| FeedScopedId::new("demo", s);
/// let time = |s: &str| ServiceTime::parse(s).unwrap();
///
/// let mut builder = TransitDataBuilder::new();
/// let a = builder.add_stop(StopLocation::point(id("a"), "A", 40.0, -74.0));
/// let b = builder.add_stop(StopLocation::point(id("b"), "B", 40.1, -74.0));
/// let calendar = builder.add_calendar(ServiceCalendar::daily(
///     id("all"),
///     ServiceDate::from_ymd(2024, 1, 1).unwrap(),
///     ServiceDate::from_ymd(2024, 12, 31).unwrap(),
/// ));
///
/// let trip = UnscheduledTrip::new(
///     Trip::new(id("t1"), id("r1"), calendar).into(),
///     vec![
///         WindowStopTime::new(a.clone(), time("08:00"), time("18:00")),
///         WindowStopTime::new(b, time("08:00"), time("18:00")),
///     ],
/// )
/// .unwrap();
/// builder.add_flex_trip(trip.into()).unwrap();
///
/// let data = builder.build();
/// assert_eq!(data.flex_trips_near(&a).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct TransitDataBuilder {
    stops: HashMap<FeedScopedId, Arc<StopLocation>>,
    calendars: HashMap<FeedScopedId, Arc<ServiceCalendar>>,
    trips: Vec<Arc<FlexTrip>>,
    trip_ids: HashSet<FeedScopedId>,
}

impl TransitDataBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop, replacing any stop with the same id.
    pub fn add_stop(&mut self, stop: StopLocation) -> Arc<StopLocation> {
        let stop = Arc::new(stop);
        self.stops.insert(stop.id.clone(), Arc::clone(&stop));
        stop
    }

    /// Add a calendar, replacing any calendar with the same id.
    pub fn add_calendar(&mut self, calendar: ServiceCalendar) -> Arc<ServiceCalendar> {
        let calendar = Arc::new(calendar);
        self.calendars
            .insert(calendar.id.clone(), Arc::clone(&calendar));
        calendar
    }

    /// Look up a stop added earlier.
    pub fn stop(&self, id: &FeedScopedId) -> Option<&Arc<StopLocation>> {
        self.stops.get(id)
    }

    /// Look up a calendar added earlier.
    pub fn calendar(&self, id: &FeedScopedId) -> Option<&Arc<ServiceCalendar>> {
        self.calendars.get(id)
    }

    /// Add a flexible trip.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the trip id is already taken, or the trip uses a
    /// stop or calendar that was not added first.
    pub fn add_flex_trip(&mut self, trip: FlexTrip) -> Result<Arc<FlexTrip>, DataError> {
        let id = trip.id().clone();
        if self.trip_ids.contains(&id) {
            return Err(DataError::CorruptTrip {
                trip: id,
                reason: "duplicate trip id".into(),
            });
        }

        let calendar = &trip.trip().calendar.id;
        if !self.calendars.contains_key(calendar) {
            return Err(DataError::UnknownCalendar {
                trip: id,
                calendar: calendar.clone(),
            });
        }

        let unknown = (0..trip.stop_count())
            .filter_map(|i| trip.stop(StopIndex(i)))
            .find(|stop| !self.stops.contains_key(&stop.id));
        if let Some(stop) = unknown {
            return Err(DataError::UnknownStop {
                trip: id,
                stop: stop.id.clone(),
            });
        }

        let trip = Arc::new(trip);
        self.trip_ids.insert(id);
        self.trips.push(Arc::clone(&trip));
        Ok(trip)
    }

    /// Freeze the data and build the stop index.
    pub fn build(self) -> TransitData {
        let mut trips_by_stop: HashMap<FeedScopedId, Vec<Arc<FlexTrip>>> = HashMap::new();
        for trip in &self.trips {
            for stop in trip.stops() {
                trips_by_stop
                    .entry(stop.id.clone())
                    .or_default()
                    .push(Arc::clone(trip));
            }
        }

        let mut area_stops: Vec<_> = self
            .stops
            .values()
            .filter(|stop| stop.is_area())
            .cloned()
            .collect();
        area_stops.sort_by(|a, b| a.id.cmp(&b.id));

        TransitData {
            stops: self.stops,
            calendars: self.calendars,
            trips: self.trips,
            trips_by_stop,
            area_stops,
        }
    }
}

/// Stops, calendars and flexible trips for one data partition.
///
/// Immutable once built and shared between searches as
/// `Arc<TransitData>`.
#[derive(Debug, Default)]
pub struct TransitData {
    stops: HashMap<FeedScopedId, Arc<StopLocation>>,
    calendars: HashMap<FeedScopedId, Arc<ServiceCalendar>>,
    trips: Vec<Arc<FlexTrip>>,
    // Trips boarding or alighting at each stop
    trips_by_stop: HashMap<FeedScopedId, Vec<Arc<FlexTrip>>>,
    // Zones, sorted by id
    area_stops: Vec<Arc<StopLocation>>,
}

impl TransitData {
    /// Look up a stop by id.
    pub fn stop(&self, id: &FeedScopedId) -> Option<&Arc<StopLocation>> {
        self.stops.get(id)
    }

    /// Look up a calendar by id.
    pub fn calendar(&self, id: &FeedScopedId) -> Option<&Arc<ServiceCalendar>> {
        self.calendars.get(id)
    }

    /// Returns the number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Returns all flexible trips, in the order they were added.
    pub fn flex_trips(&self) -> &[Arc<FlexTrip>] {
        &self.trips
    }

    /// Flexible trips a rider at `stop` could board or alight.
    ///
    /// Includes trips serving the stop itself and trips serving a zone the
    /// stop lies in. Each trip appears once.
    pub fn flex_trips_near(&self, stop: &StopLocation) -> Vec<Arc<FlexTrip>> {
        let mut seen = HashSet::new();
        let direct = self.trips_by_stop.get(&stop.id).into_iter().flatten();
        let zonal = self
            .area_stops
            .iter()
            .filter(|area| area.id != stop.id && area.covers(&stop.point))
            .filter_map(|area| self.trips_by_stop.get(&area.id))
            .flatten();

        direct
            .chain(zonal)
            .filter(|trip| seen.insert(trip.id().clone()))
            .cloned()
            .collect()
    }

    /// Stops within `radius_meters` of `point` in a straight line, closest first.
    ///
    /// Walking time assumes `walk_speed_mps`. A zone containing the point
    /// is reached with no walk at all.
    pub fn nearby_stops(
        &self,
        point: Point<f64>,
        radius_meters: f64,
        walk_speed_mps: f64,
    ) -> Vec<NearbyStop> {
        let mut nearby: Vec<NearbyStop> = self
            .stops
            .values()
            .filter_map(|stop| {
                let distance = if stop.covers(&point) {
                    0.0
                } else {
                    Haversine.distance(point, stop.point)
                };
                (distance <= radius_meters).then(|| {
                    let walk = walk_seconds(distance, walk_speed_mps);
                    NearbyStop::new(Arc::clone(stop), distance, walk)
                })
            })
            .collect();

        nearby.sort_by(|a, b| {
            a.distance_meters
                .total_cmp(&b.distance_meters)
                .then_with(|| a.stop.id.cmp(&b.stop.id))
        });
        nearby
    }

    /// Access templates for a journey leaving at `departure`.
    ///
    /// Trips on the previous service date are included, since they may
    /// still be running after midnight.
    pub fn flex_access_templates(
        &self,
        nearby: &[NearbyStop],
        departure: NaiveDateTime,
        calculator: &dyn DistanceCalculator,
    ) -> Vec<FlexAccessTemplate> {
        let mut templates = Vec::new();
        for (date, offset) in service_dates_around(departure) {
            for stop in nearby {
                for trip in self.flex_trips_near(&stop.stop) {
                    templates.extend(trip.flex_access_templates(stop, offset, date, calculator));
                }
            }
        }
        debug!(
            nearby = nearby.len(),
            templates = templates.len(),
            %departure,
            "generated flex access templates"
        );
        templates
    }

    /// Egress templates for a journey arriving by `arrival`.
    pub fn flex_egress_templates(
        &self,
        nearby: &[NearbyStop],
        arrival: NaiveDateTime,
        calculator: &dyn DistanceCalculator,
    ) -> Vec<FlexEgressTemplate> {
        let mut templates = Vec::new();
        for (date, offset) in service_dates_around(arrival) {
            for stop in nearby {
                for trip in self.flex_trips_near(&stop.stop) {
                    templates.extend(trip.flex_egress_templates(stop, offset, date, calculator));
                }
            }
        }
        debug!(
            nearby = nearby.len(),
            templates = templates.len(),
            %arrival,
            "generated flex egress templates"
        );
        templates
    }
}

/// The service dates whose trips may be running at `time`, with the
/// offset of each date's midnight from `time`.
fn service_dates_around(time: NaiveDateTime) -> Vec<(ServiceDate, i32)> {
    let today = ServiceDate::new(time.date());
    [today.previous(), Some(today)]
        .into_iter()
        .flatten()
        .filter_map(|date| Some((date, date.offset_from(time)?)))
        .collect()
}

fn walk_seconds(distance_meters: f64, speed_mps: f64) -> i32 {
    if speed_mps <= 0.0 {
        return i32::MAX;
    }
    let seconds = (distance_meters / speed_mps).ceil();
    if seconds >= f64::from(i32::MAX) {
        i32::MAX
    } else {
        seconds as i32
    }
}
