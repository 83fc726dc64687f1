//! JSON feed snapshots.
//!
//! A snapshot holds one feed's stops, calendars and flexible trips. Ids in
//! the file are plain strings; they are scoped by the snapshot's `feedId`
//! when loaded. Times are `HH:MM[:SS]` on the service day and may run past
//! 24:00. Zone outlines are rings of `[lon, lat]` pairs.
//!
//! ```json
//! {
//!   "feedId": "demo",
//!   "stops": [
//!     { "id": "zone", "name": "North zone", "area": [[-74.1, 40.0], [-74.0, 40.0], [-74.0, 40.1]] },
//!     { "id": "hub", "name": "Hub", "lat": 40.2, "lon": -74.0 }
//!   ],
//!   "calendars": [
//!     { "id": "weekdays", "weekdays": [true, true, true, true, true, false, false],
//!       "start": "2024-01-01", "end": "2024-12-31" }
//!   ],
//!   "trips": [
//!     { "id": "dar1", "routeId": "dar", "serviceId": "weekdays", "kind": "unscheduled",
//!       "maxRideSeconds": 3600,
//!       "stopTimes": [
//!         { "stopId": "zone", "windowStart": "07:00", "windowEnd": "19:00" },
//!         { "stopId": "hub", "windowStart": "07:00", "windowEnd": "19:00" }
//!       ] }
//!   ]
//! }
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use geo::{LineString, Polygon};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::domain::{FeedScopedId, ServiceCalendar, ServiceDate, ServiceTime, StopLocation, Trip};
use crate::flex::{
    FlexTrip, FlexTripError, ScheduledDeviatedTrip, ScheduledStopTime, UnscheduledTrip,
    WindowStopTime,
};

use super::{DataError, TransitData, TransitDataBuilder};

/// One feed's data as stored on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    /// Feed id used to scope every other id
    pub feed_id: String,
    #[serde(default)]
    pub stops: Vec<StopRecord>,
    #[serde(default)]
    pub calendars: Vec<CalendarRecord>,
    #[serde(default)]
    pub trips: Vec<TripRecord>,
}

/// A stop or zone.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecord {
    pub id: String,
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Zone outline as `[lon, lat]` pairs
    pub area: Option<Vec<[f64; 2]>>,
}

/// A weekly service pattern with exceptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarRecord {
    pub id: String,
    /// Monday first
    pub weekdays: [bool; 7],
    pub start: ServiceDate,
    pub end: ServiceDate,
    #[serde(default)]
    pub added: Vec<ServiceDate>,
    #[serde(default)]
    pub removed: Vec<ServiceDate>,
}

/// A flexible trip of either kind.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub id: String,
    pub route_id: String,
    pub service_id: String,
    pub headsign: Option<String>,
    #[serde(default)]
    pub wheelchair_accessible: bool,
    #[serde(flatten)]
    pub schedule: ScheduleRecord,
}

/// How a trip's times are defined.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleRecord {
    ScheduledDeviated {
        #[serde(rename = "stopTimes")]
        stop_times: Vec<ScheduledStopRecord>,
    },
    Unscheduled {
        #[serde(rename = "stopTimes")]
        stop_times: Vec<WindowStopRecord>,
        #[serde(rename = "maxRideSeconds", default)]
        max_ride_seconds: Option<i32>,
    },
}

/// A stop time with optional published times.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledStopRecord {
    pub stop_id: String,
    #[serde(default, deserialize_with = "optional_service_time")]
    pub arrival: Option<ServiceTime>,
    #[serde(default, deserialize_with = "optional_service_time")]
    pub departure: Option<ServiceTime>,
    #[serde(default = "allowed")]
    pub pickup: bool,
    #[serde(default = "allowed")]
    pub drop_off: bool,
}

/// A stop time with a service window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStopRecord {
    pub stop_id: String,
    #[serde(deserialize_with = "service_time")]
    pub window_start: ServiceTime,
    #[serde(deserialize_with = "service_time")]
    pub window_end: ServiceTime,
    #[serde(default = "allowed")]
    pub pickup: bool,
    #[serde(default = "allowed")]
    pub drop_off: bool,
}

fn allowed() -> bool {
    true
}

/// Deserialize an `HH:MM[:SS]` string into a service time.
fn service_time<'de, D>(deserializer: D) -> Result<ServiceTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ServiceTime::parse(&s).map_err(serde::de::Error::custom)
}

fn optional_service_time<'de, D>(deserializer: D) -> Result<Option<ServiceTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| ServiceTime::parse(&s).map_err(serde::de::Error::custom))
        .transpose()
}

impl FeedSnapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Check the snapshot and build its transit data.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a stop has no location, a trip references a
    /// missing stop or calendar, or a trip's stop times are inconsistent.
    pub fn into_transit_data(self) -> Result<TransitData, DataError> {
        let feed = self.feed_id;
        let scoped = |id: &str| FeedScopedId::new(feed.clone(), id);
        let mut builder = TransitDataBuilder::new();

        for record in self.stops {
            builder.add_stop(stop_location(scoped(&record.id), record)?);
        }

        for record in self.calendars {
            builder.add_calendar(ServiceCalendar {
                id: scoped(&record.id),
                weekdays: record.weekdays,
                start: record.start,
                end: record.end,
                added: record.added.into_iter().collect::<BTreeSet<_>>(),
                removed: record.removed.into_iter().collect::<BTreeSet<_>>(),
            });
        }

        for record in self.trips {
            let trip_id = scoped(&record.id);
            let calendar_id = scoped(&record.service_id);
            let calendar = builder
                .calendar(&calendar_id)
                .cloned()
                .ok_or_else(|| DataError::UnknownCalendar {
                    trip: trip_id.clone(),
                    calendar: calendar_id,
                })?;

            let trip = Arc::new(Trip {
                id: trip_id.clone(),
                route_id: scoped(&record.route_id),
                headsign: record.headsign,
                wheelchair_accessible: record.wheelchair_accessible,
                calendar,
            });

            let stop = |stop_id: &str| {
                let id = scoped(stop_id);
                builder
                    .stop(&id)
                    .cloned()
                    .ok_or_else(|| DataError::UnknownStop {
                        trip: trip_id.clone(),
                        stop: id,
                    })
            };

            let flex_trip: Result<FlexTrip, FlexTripError> = match record.schedule {
                ScheduleRecord::ScheduledDeviated { stop_times } => {
                    let stop_times = stop_times
                        .into_iter()
                        .map(|st| {
                            Ok(ScheduledStopTime::new(stop(&st.stop_id)?, st.arrival, st.departure)
                                .with_boarding(st.pickup)
                                .with_alighting(st.drop_off))
                        })
                        .collect::<Result<Vec<_>, DataError>>()?;
                    ScheduledDeviatedTrip::new(trip, stop_times).map(FlexTrip::from)
                }
                ScheduleRecord::Unscheduled {
                    stop_times,
                    max_ride_seconds,
                } => {
                    let stop_times = stop_times
                        .into_iter()
                        .map(|st| {
                            Ok(WindowStopTime::new(stop(&st.stop_id)?, st.window_start, st.window_end)
                                .with_boarding(st.pickup)
                                .with_alighting(st.drop_off))
                        })
                        .collect::<Result<Vec<_>, DataError>>()?;
                    UnscheduledTrip::new(trip, stop_times).and_then(|t| match max_ride_seconds {
                        Some(max) => t.with_max_ride(max),
                        None => Ok(t),
                    })
                    .map(FlexTrip::from)
                }
            };

            let flex_trip = flex_trip.map_err(|e| DataError::CorruptTrip {
                trip: trip_id,
                reason: e.to_string(),
            })?;
            builder.add_flex_trip(flex_trip)?;
        }

        Ok(builder.build())
    }
}

fn stop_location(id: FeedScopedId, record: StopRecord) -> Result<StopLocation, DataError> {
    let located = |stop: StopLocation| match (record.lat, record.lon) {
        (Some(lat), Some(lon)) => stop.with_point(lat, lon),
        _ => stop,
    };

    match (record.area, record.lat, record.lon) {
        (Some(ring), _, _) if ring.len() >= 3 => {
            let area = Polygon::new(LineString::from(ring), vec![]);
            Ok(located(StopLocation::area(id, record.name, area)))
        }
        (None, Some(lat), Some(lon)) => Ok(StopLocation::point(id, record.name, lat, lon)),
        _ => Err(DataError::CorruptStop {
            stop: id,
            reason: "needs lat and lon, or an area of at least three points",
        }),
    }
}

/// Load a feed snapshot file.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read or parsed, or its data is
/// inconsistent.
pub fn load_feed(path: &Path) -> Result<TransitData, DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = FeedSnapshot::from_json(&text).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let feed_id = snapshot.feed_id.clone();
    let data = snapshot.into_transit_data()?;
    info!(
        path = %path.display(),
        feed = %feed_id,
        stops = data.stop_count(),
        trips = data.flex_trips().len(),
        "loaded feed"
    );
    Ok(data)
}
