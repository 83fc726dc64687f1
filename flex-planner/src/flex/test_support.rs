//! Shared fixtures for flexible trip tests.

use std::sync::Arc;

use geo::polygon;

use crate::domain::{FeedScopedId, ServiceCalendar, ServiceDate, ServiceTime, StopLocation, Trip};

pub fn id(s: &str) -> FeedScopedId {
    FeedScopedId::new("t", s)
}

pub fn service_date() -> ServiceDate {
    ServiceDate::from_ymd(2024, 3, 15).unwrap()
}

/// Runs every day in 2024.
pub fn calendar() -> Arc<ServiceCalendar> {
    Arc::new(ServiceCalendar::daily(
        id("daily"),
        ServiceDate::from_ymd(2024, 1, 1).unwrap(),
        ServiceDate::from_ymd(2024, 12, 31).unwrap(),
    ))
}

pub fn trip(name: &str) -> Arc<Trip> {
    Arc::new(Trip::new(id(name), id("route"), calendar()))
}

pub fn point_stop(name: &str, lat: f64, lon: f64) -> Arc<StopLocation> {
    Arc::new(StopLocation::point(id(name), name, lat, lon))
}

/// A square zone with its representative point at the centre.
pub fn zone(name: &str, lat: f64, lon: f64, half_side: f64) -> Arc<StopLocation> {
    let area = polygon![
        (x: lon - half_side, y: lat - half_side),
        (x: lon + half_side, y: lat - half_side),
        (x: lon + half_side, y: lat + half_side),
        (x: lon - half_side, y: lat + half_side),
    ];
    Arc::new(StopLocation::area(id(name), name, area).with_point(lat, lon))
}

pub fn t(s: &str) -> ServiceTime {
    ServiceTime::parse(s).unwrap()
}
