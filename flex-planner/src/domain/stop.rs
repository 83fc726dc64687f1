//! Stop locations, including flexible service areas.

use geo::{Contains, Point, Polygon};

use super::FeedScopedId;

/// A place a vehicle can pick up or drop off riders.
///
/// Fixed stops are a single point. Flexible services also serve areas:
/// a rider anywhere inside the zone can be picked up, so the stop carries
/// the zone polygon alongside a representative point used for distance
/// estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct StopLocation {
    /// Feed-scoped stop id
    pub id: FeedScopedId,
    /// Display name
    pub name: String,
    /// Representative point (x = lon, y = lat)
    pub point: Point<f64>,
    /// Service zone, for area stops
    pub area: Option<Polygon<f64>>,
}

impl StopLocation {
    /// Create a fixed point stop.
    pub fn point(id: FeedScopedId, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id,
            name: name.into(),
            point: Point::new(lon, lat),
            area: None,
        }
    }

    /// Create an area stop with the given zone.
    ///
    /// The representative point is the first exterior vertex unless one is
    /// set afterwards.
    pub fn area(id: FeedScopedId, name: impl Into<String>, area: Polygon<f64>) -> Self {
        let point = area
            .exterior()
            .points()
            .next()
            .unwrap_or_else(|| Point::new(0.0, 0.0));
        Self {
            id,
            name: name.into(),
            point,
            area: Some(area),
        }
    }

    /// Replace the representative point.
    pub fn with_point(mut self, lat: f64, lon: f64) -> Self {
        self.point = Point::new(lon, lat);
        self
    }

    /// True if this is a flexible service area rather than a fixed stop.
    pub fn is_area(&self) -> bool {
        self.area.is_some()
    }

    /// Check whether a rider at `point` can be served by this stop.
    ///
    /// Fixed stops never cover arbitrary points; match them by id with
    /// [`StopLocation::serves`].
    pub fn covers(&self, point: &Point<f64>) -> bool {
        self.area.as_ref().is_some_and(|area| area.contains(point))
    }

    /// Check whether a rider who has reached `other` can board or alight here.
    ///
    /// True for the same stop, or when `other` lies inside this stop's zone.
    pub fn serves(&self, other: &StopLocation) -> bool {
        self.id == other.id || self.covers(&other.point)
    }

    /// Latitude of the representative point.
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// Longitude of the representative point.
    pub fn lon(&self) -> f64 {
        self.point.x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn id(s: &str) -> FeedScopedId {
        FeedScopedId::new("f", s)
    }

    fn zone() -> Polygon<f64> {
        polygon![
            (x: -74.0, y: 40.0),
            (x: -73.9, y: 40.0),
            (x: -73.9, y: 40.1),
            (x: -74.0, y: 40.1),
        ]
    }

    #[test]
    fn point_stop_serves_only_itself() {
        let a = StopLocation::point(id("A"), "A", 40.05, -73.95);
        let b = StopLocation::point(id("B"), "B", 40.05, -73.95);
        assert!(a.serves(&a));
        assert!(!a.serves(&b));
        assert!(!a.is_area());
    }

    #[test]
    fn area_stop_serves_points_inside() {
        let zone = StopLocation::area(id("Z"), "Zone", zone()).with_point(40.05, -73.95);
        let inside = StopLocation::point(id("in"), "in", 40.05, -73.95);
        let outside = StopLocation::point(id("out"), "out", 40.5, -73.95);

        assert!(zone.is_area());
        assert!(zone.serves(&inside));
        assert!(!zone.serves(&outside));
        assert!(zone.covers(&Point::new(-73.95, 40.02)));
    }

    #[test]
    fn area_default_point_is_on_boundary() {
        let zone = StopLocation::area(id("Z"), "Zone", zone());
        assert_eq!(zone.lat(), 40.0);
        assert_eq!(zone.lon(), -74.0);
    }
}
