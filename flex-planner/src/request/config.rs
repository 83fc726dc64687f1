//! Validation limits and defaults.

use crate::domain::{ModeSet, TraverseMode};

/// Limits and defaults applied while validating search parameters.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Upper bound on the number of itineraries returned.
    pub max_itineraries: i32,

    /// Upper bound on the number of transfers.
    /// Requests above this are capped; requests below are left alone.
    pub max_transfers: i32,

    /// Allowed distance of the triangle factor sum from 1.
    pub triangle_tolerance: f64,

    /// Transfer penalty added when the legacy TRANSFERS objective is used.
    pub legacy_transfers_penalty: i32,

    /// Maximum walk distance (meters) when none is given.
    pub default_max_walk_distance: f64,

    /// Itinerary count when none is given.
    pub default_num_itineraries: i32,

    /// Minimum transfer time (seconds) when none is given.
    pub default_min_transfer_time: i32,

    /// Maximum transfers when none is given.
    pub default_max_transfers: i32,

    /// Modes used when none are given.
    pub default_modes: ModeSet,
}

impl ValidatorConfig {
    /// Set a custom triangle tolerance.
    pub fn with_triangle_tolerance(mut self, tolerance: f64) -> Self {
        self.triangle_tolerance = tolerance;
        self
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        let mut default_modes: ModeSet = TraverseMode::TRANSIT.into_iter().collect();
        default_modes.insert(TraverseMode::Walk);

        Self {
            max_itineraries: 3,
            max_transfers: 4,
            triangle_tolerance: 3.0 * f64::from(f32::EPSILON), // 3 single-precision ulp of 1.0
            legacy_transfers_penalty: 1800,
            default_max_walk_distance: 800.0, // about half a mile
            default_num_itineraries: 3,
            default_min_transfer_time: 240,
            default_max_transfers: 2,
            default_modes,
        }
    }
}
