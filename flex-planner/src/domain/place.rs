//! Place descriptors for origins, destinations and intermediate stops.

use std::fmt;

use geo::Point;
use serde::Serialize;

/// Error returned when parsing an invalid place descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid place: {reason}")]
pub struct InvalidPlace {
    reason: &'static str,
}

impl InvalidPlace {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A location a rider wants to travel from, to, or via.
///
/// Accepted text forms:
/// - `lat,lon` in degrees, e.g. `40.714476,-74.005966`
/// - `name::lat,lon`, a coordinate with a display name
/// - anything else non-blank is a street-network vertex label,
///   e.g. `mtanyctsubway_A27_S`
///
/// # Examples
///
/// ```
/// use flex_planner::domain::Place;
///
/// let p = Place::parse("40.714476,-74.005966").unwrap();
/// assert!(p.point().is_some());
///
/// let v = Place::parse("mtanyctsubway_A27_S").unwrap();
/// assert_eq!(
///     v,
///     Place::Vertex {
///         label: "mtanyctsubway_A27_S".into()
///     }
/// );
///
/// assert!(Place::parse("  ").is_err());
/// assert!(Place::parse("91.0,0.0").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Place {
    Coordinate { lat: f64, lon: f64 },
    Named { name: String, lat: f64, lon: f64 },
    Vertex { label: String },
}

impl Place {
    /// Parse a place descriptor.
    pub fn parse(s: &str) -> Result<Self, InvalidPlace> {
        let s = s.trim();
        if s.is_empty() {
            return Err(InvalidPlace::new("must not be blank"));
        }

        if let Some((name, coords)) = s.split_once("::") {
            let (lat, lon) = parse_lat_lon(coords)?
                .ok_or_else(|| InvalidPlace::new("expected name::lat,lon"))?;
            return Ok(Place::Named {
                name: name.trim().to_string(),
                lat,
                lon,
            });
        }

        match parse_lat_lon(s)? {
            Some((lat, lon)) => Ok(Place::Coordinate { lat, lon }),
            None => Ok(Place::Vertex {
                label: s.to_string(),
            }),
        }
    }

    /// Returns the place as a point (x = lon, y = lat), if it has coordinates.
    pub fn point(&self) -> Option<Point<f64>> {
        match self {
            Place::Coordinate { lat, lon } | Place::Named { lat, lon, .. } => {
                Some(Point::new(*lon, *lat))
            }
            Place::Vertex { .. } => None,
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Coordinate { lat, lon } => write!(f, "{lat},{lon}"),
            Place::Named { name, lat, lon } => write!(f, "{name}::{lat},{lon}"),
            Place::Vertex { label } => f.write_str(label),
        }
    }
}

/// Parse `lat,lon`.
///
/// Returns `Ok(None)` when the text is not shaped like a coordinate pair
/// at all, and an error when it is but the numbers are out of range.
fn parse_lat_lon(s: &str) -> Result<Option<(f64, f64)>, InvalidPlace> {
    let Some((lat, lon)) = s.split_once(',') else {
        return Ok(None);
    };
    let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) else {
        return Ok(None);
    };

    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(InvalidPlace::new("latitude must be within -90..90"));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(InvalidPlace::new("longitude must be within -180..180"));
    }

    Ok(Some((lat, lon)))
}
