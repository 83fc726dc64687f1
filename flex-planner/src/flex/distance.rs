//! Estimating flexible vehicle travel between two points.

use geo::{Distance, Haversine, Point};
use serde::Serialize;

/// Distance and duration of a flexible ride between two stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexPath {
    /// Distance the vehicle travels, in meters
    pub distance_meters: f64,
    /// Time the ride takes, in seconds
    pub duration_seconds: i32,
}

impl FlexPath {
    /// Create a path from a distance and duration.
    pub fn new(distance_meters: f64, duration_seconds: i32) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }
}

/// Estimates how long a flexible vehicle takes between two points.
///
/// Implementations must be pure: the same inputs give the same answer and
/// nothing is mutated, so one calculator can be shared by every search
/// running at once. `None` means the pair is outside what the calculator
/// is willing to estimate (too far apart, no road connection, ...).
///
/// Any `Fn(Point, Point) -> Option<FlexPath>` closure is a calculator,
/// which keeps tests short:
///
/// ```
/// use flex_planner::flex::{DistanceCalculator, FlexPath};
/// use geo::Point;
///
/// let fixed = |_: Point<f64>, _: Point<f64>| Some(FlexPath::new(1000.0, 120));
/// let path = fixed.calculate(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
/// assert_eq!(path.map(|p| p.duration_seconds), Some(120));
/// ```
pub trait DistanceCalculator: Send + Sync {
    /// Estimate the ride from `from` to `to` (x = lon, y = lat).
    fn calculate(&self, from: Point<f64>, to: Point<f64>) -> Option<FlexPath>;
}

impl<F> DistanceCalculator for F
where
    F: Fn(Point<f64>, Point<f64>) -> Option<FlexPath> + Send + Sync,
{
    fn calculate(&self, from: Point<f64>, to: Point<f64>) -> Option<FlexPath> {
        self(from, to)
    }
}

/// Straight-line estimate: great-circle distance stretched by a detour
/// factor, driven at a constant speed.
///
/// # Examples
///
/// ```
/// use flex_planner::flex::{DirectDistanceCalculator, DistanceCalculator};
/// use geo::Point;
///
/// let calculator = DirectDistanceCalculator::default().with_max_distance(5_000.0);
///
/// let near = calculator.calculate(Point::new(-74.0, 40.0), Point::new(-74.0, 40.01));
/// assert!(near.is_some());
///
/// let far = calculator.calculate(Point::new(-74.0, 40.0), Point::new(-74.0, 41.0));
/// assert!(far.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DirectDistanceCalculator {
    /// Vehicle speed in meters per second
    pub speed_mps: f64,
    /// Multiplier from straight-line to road distance
    pub detour_factor: f64,
    /// Longest road distance estimated, in meters
    pub max_distance_meters: Option<f64>,
}

impl DirectDistanceCalculator {
    /// Create a calculator with the given speed and detour factor.
    pub fn new(speed_mps: f64, detour_factor: f64) -> Self {
        Self {
            speed_mps,
            detour_factor,
            max_distance_meters: None,
        }
    }

    /// Refuse to estimate rides longer than `meters`.
    pub fn with_max_distance(mut self, meters: f64) -> Self {
        self.max_distance_meters = Some(meters);
        self
    }
}

impl Default for DirectDistanceCalculator {
    fn default() -> Self {
        // About 29 km/h average including stops
        Self::new(8.0, 1.3)
    }
}

impl DistanceCalculator for DirectDistanceCalculator {
    fn calculate(&self, from: Point<f64>, to: Point<f64>) -> Option<FlexPath> {
        if self.speed_mps <= 0.0 {
            return None;
        }

        let distance = Haversine.distance(from, to) * self.detour_factor;
        if !distance.is_finite() {
            return None;
        }
        if self.max_distance_meters.is_some_and(|max| distance > max) {
            return None;
        }

        let seconds = (distance / self.speed_mps).ceil();
        if seconds > f64::from(i32::MAX) {
            return None;
        }
        Some(FlexPath::new(distance, seconds as i32))
    }
}
