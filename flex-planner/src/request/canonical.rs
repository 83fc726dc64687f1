//! The canonical, validated search request.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{ModeSet, Place};

use super::OptimizeType;

/// Triangle optimization weights.
///
/// Always an affine combination: each factor lies in 0..1 and the three
/// sum to 1 within the validator's tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TriangleFactors {
    pub safety: f64,
    pub slope: f64,
    pub time: f64,
}

/// A validated search request.
///
/// Only [`RequestValidator`](super::RequestValidator) builds these, so
/// every cross-field constraint has already been checked. Fields are
/// private and read through accessors; a request never changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub(super) router_id: String,
    pub(super) from: Place,
    pub(super) to: Place,
    pub(super) intermediate_places: Vec<Place>,
    pub(super) intermediate_places_ordered: bool,
    pub(super) date_time: NaiveDateTime,
    pub(super) arrive_by: bool,
    pub(super) wheelchair: bool,
    pub(super) max_walk_distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) walk_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) triangle: Option<TriangleFactors>,
    pub(super) optimize: OptimizeType,
    pub(super) modes: ModeSet,
    pub(super) min_transfer_time: i32,
    pub(super) num_itineraries: i32,
    pub(super) preferred_routes: Vec<String>,
    pub(super) unpreferred_routes: Vec<String>,
    pub(super) banned_routes: Vec<String>,
    pub(super) show_intermediate_stops: bool,
    pub(super) transfer_penalty: i32,
    pub(super) max_transfers: i32,
}

impl Request {
    /// Data partition to search.
    pub fn router_id(&self) -> &str {
        &self.router_id
    }

    /// Origin.
    pub fn from(&self) -> &Place {
        &self.from
    }

    /// Destination.
    pub fn to(&self) -> &Place {
        &self.to
    }

    /// Places to visit on the way; empty if none.
    pub fn intermediate_places(&self) -> &[Place] {
        &self.intermediate_places
    }

    /// Whether intermediate places must be visited in list order.
    pub fn intermediate_places_ordered(&self) -> bool {
        self.intermediate_places_ordered
    }

    /// Requested departure (or arrival, with [`Request::arrive_by`]) time.
    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    /// Whether [`Request::date_time`] is a latest arrival.
    pub fn arrive_by(&self) -> bool {
        self.arrive_by
    }

    /// Whether the trip must be wheelchair accessible.
    pub fn wheelchair(&self) -> bool {
        self.wheelchair
    }

    /// Maximum walking distance in meters.
    pub fn max_walk_distance(&self) -> f64 {
        self.max_walk_distance
    }

    /// Walking speed in m/s, if the caller gave one.
    pub fn walk_speed(&self) -> Option<f64> {
        self.walk_speed
    }

    /// Triangle weights; present exactly when optimize is TRIANGLE.
    pub fn triangle(&self) -> Option<TriangleFactors> {
        self.triangle
    }

    /// Search objective. Never the legacy TRANSFERS value.
    pub fn optimize(&self) -> OptimizeType {
        self.optimize
    }

    /// Modes the rider is willing to use.
    pub fn modes(&self) -> ModeSet {
        self.modes
    }

    /// Minimum seconds between vehicles at a transfer.
    pub fn min_transfer_time(&self) -> i32 {
        self.min_transfer_time
    }

    /// Number of itineraries wanted, within 1..=max.
    pub fn num_itineraries(&self) -> i32 {
        self.num_itineraries
    }

    /// Preferred routes (agency_route).
    pub fn preferred_routes(&self) -> &[String] {
        &self.preferred_routes
    }

    /// Unpreferred routes (agency_route).
    pub fn unpreferred_routes(&self) -> &[String] {
        &self.unpreferred_routes
    }

    /// Banned routes (agency_route).
    pub fn banned_routes(&self) -> &[String] {
        &self.banned_routes
    }

    /// Whether to report stops passed without boarding or alighting.
    pub fn show_intermediate_stops(&self) -> bool {
        self.show_intermediate_stops
    }

    /// Extra cost for every boarding after the first.
    pub fn transfer_penalty(&self) -> i32 {
        self.transfer_penalty
    }

    /// Maximum number of transfers.
    pub fn max_transfers(&self) -> i32 {
        self.max_transfers
    }
}
