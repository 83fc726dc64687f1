//! Data transfer objects for web responses.

use serde::Serialize;

use crate::domain::StopLocation;
use crate::flex::{FlexAccessTemplate, FlexEgressTemplate, FlexPath, NearbyStop};
use crate::request::Request;

/// Response to a plan request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    /// The request after validation and defaulting
    pub request: Request,

    /// Flexible rides that can start the journey
    pub access: Vec<AccessResult>,

    /// Flexible rides that can end the journey
    pub egress: Vec<EgressResult>,
}

/// A stop or zone.
#[derive(Debug, Serialize)]
pub struct StopResult {
    /// Feed-scoped id, as `feed:id`
    pub id: String,

    pub name: String,

    /// Representative point
    pub lat: f64,
    pub lon: f64,

    /// Whether this is a zone rather than a point
    pub is_area: bool,
}

impl StopResult {
    pub fn from_stop(stop: &StopLocation) -> Self {
        Self {
            id: stop.id.to_string(),
            name: stop.name.clone(),
            lat: stop.lat(),
            lon: stop.lon(),
            is_area: stop.is_area(),
        }
    }
}

/// The walk between a place and a stop.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkResult {
    pub stop: StopResult,
    pub distance_meters: f64,
    pub duration_seconds: i32,
}

impl WalkResult {
    fn from_nearby(nearby: &NearbyStop) -> Self {
        Self {
            stop: StopResult::from_stop(&nearby.stop),
            distance_meters: nearby.distance_meters,
            duration_seconds: nearby.duration_seconds,
        }
    }
}

/// A flexible ride from near the origin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResult {
    pub trip_id: String,
    pub route_id: String,

    /// `scheduled_deviated` or `unscheduled`
    pub kind: &'static str,

    /// Service date the ride belongs to
    pub service_date: String,

    /// Walk from the origin to the boarding stop
    pub walk: WalkResult,

    /// Where the ride ends and the rest of the journey begins
    pub transfer_stop: StopResult,

    pub ride: FlexPath,

    /// Departure on the service day, as `HH:MM:SS`
    pub departure_time: String,

    /// Seconds after the requested time that the ride leaves
    pub departure_search_time: i64,

    /// Seconds after the requested time that the ride arrives
    pub arrival_search_time: i64,
}

impl AccessResult {
    pub fn from_template(template: &FlexAccessTemplate) -> Self {
        let trip = template.trip().trip();
        Self {
            trip_id: trip.id.to_string(),
            route_id: trip.route_id.to_string(),
            kind: template.trip().kind(),
            service_date: template.service_date().to_string(),
            walk: WalkResult::from_nearby(template.access()),
            transfer_stop: StopResult::from_stop(template.transfer_stop()),
            ride: template.flex_path(),
            departure_time: template.departure_time().to_string(),
            departure_search_time: template.departure_search_time(),
            arrival_search_time: template.arrival_search_time(),
        }
    }
}

/// A flexible ride to near the destination.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EgressResult {
    pub trip_id: String,
    pub route_id: String,
    pub kind: &'static str,
    pub service_date: String,

    /// Where the ride starts, reached by the earlier part of the journey
    pub transfer_stop: StopResult,

    /// Walk from the alighting stop to the destination
    pub walk: WalkResult,

    pub ride: FlexPath,

    /// Latest arrival on the service day, as `HH:MM:SS`
    pub arrival_time: String,

    /// Seconds relative to the requested time, negative when earlier
    pub departure_search_time: i64,
    pub arrival_search_time: i64,
}

impl EgressResult {
    pub fn from_template(template: &FlexEgressTemplate) -> Self {
        let trip = template.trip().trip();
        Self {
            trip_id: trip.id.to_string(),
            route_id: trip.route_id.to_string(),
            kind: template.trip().kind(),
            service_date: template.service_date().to_string(),
            transfer_stop: StopResult::from_stop(template.transfer_stop()),
            walk: WalkResult::from_nearby(template.egress()),
            ride: template.flex_path(),
            arrival_time: template.arrival_time().to_string(),
            departure_search_time: template.departure_search_time(),
            arrival_search_time: template.arrival_search_time(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
