//! Raw search parameters, as received from the caller.

use serde::Deserialize;

use super::ParameterError;

/// Search parameters before validation.
///
/// Every field is optional so that validation can tell "not given" apart
/// from "given as the default value". Some defaults depend on other
/// parameters (triangle factors only make sense with optimize=TRIANGLE),
/// so the distinction matters.
///
/// Field names follow the query-string names (`fromPlace`, `numItineraries`,
/// ...) when deserialized.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParams {
    /// Start location: `lat,lon`, `name::lat,lon` or a vertex label
    pub from_place: Option<String>,

    /// End location (same format as `from_place`)
    pub to_place: Option<String>,

    /// Places to visit on the way
    pub intermediate_places: Vec<String>,

    /// Whether intermediate places must be visited in the given order
    pub intermediate_places_ordered: Option<bool>,

    /// Date of departure (or arrival, with `arrive_by`)
    pub date: Option<String>,

    /// Time of departure (or arrival, with `arrive_by`)
    pub time: Option<String>,

    /// Data partition to search
    pub router_id: Option<String>,

    /// Whether `date`/`time` is the latest arrival rather than earliest departure
    pub arrive_by: Option<bool>,

    /// Whether the trip must be wheelchair accessible
    pub wheelchair: Option<bool>,

    /// Maximum walking distance in meters
    pub max_walk_distance: Option<f64>,

    /// Walking speed in meters per second
    pub walk_speed: Option<f64>,

    /// Triangle weight of street safety (0..1)
    pub triangle_safety_factor: Option<f64>,

    /// Triangle weight of slope (0..1)
    pub triangle_slope_factor: Option<f64>,

    /// Triangle weight of time (0..1)
    pub triangle_time_factor: Option<f64>,

    /// Search objective name
    pub optimize: Option<String>,

    /// Comma-separated mode names
    #[serde(alias = "mode")]
    pub modes: Option<String>,

    /// Minimum seconds between vehicles at a transfer
    pub min_transfer_time: Option<i32>,

    /// Number of itineraries wanted
    pub num_itineraries: Option<i32>,

    /// Comma-separated preferred routes (agency_route)
    pub preferred_routes: Option<String>,

    /// Comma-separated unpreferred routes (agency_route)
    pub unpreferred_routes: Option<String>,

    /// Comma-separated banned routes (agency_route)
    pub banned_routes: Option<String>,

    /// Whether to report stops passed without boarding or alighting
    pub show_intermediate_stops: Option<bool>,

    /// Extra cost for every boarding after the first
    pub transfer_penalty: Option<i32>,

    /// Maximum number of transfers
    pub max_transfers: Option<i32>,
}

impl QueryParams {
    /// Create parameters with just an origin and destination.
    pub fn new(from_place: impl Into<String>, to_place: impl Into<String>) -> Self {
        Self {
            from_place: Some(from_place.into()),
            to_place: Some(to_place.into()),
            ..Self::default()
        }
    }

    /// Build parameters from decoded query-string pairs.
    ///
    /// Repeated `intermediatePlaces` keys accumulate; for other keys the
    /// last value wins. Empty values leave a field unset. Unknown keys are
    /// ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use flex_planner::request::QueryParams;
    ///
    /// let params = QueryParams::from_pairs([
    ///     ("fromPlace", "40.0,-74.0"),
    ///     ("toPlace", "40.1,-74.1"),
    ///     ("numItineraries", "2"),
    ///     ("arriveBy", "true"),
    /// ])
    /// .unwrap();
    /// assert_eq!(params.num_itineraries, Some(2));
    /// assert_eq!(params.arrive_by, Some(true));
    ///
    /// assert!(QueryParams::from_pairs([("maxTransfers", "many")]).is_err());
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ParameterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref();
            let text = Some(value.to_string()).filter(|v| !v.is_empty());

            match key.as_ref() {
                "fromPlace" => params.from_place = text,
                "toPlace" => params.to_place = text,
                "intermediatePlaces" => params.intermediate_places.push(value.to_string()),
                "intermediatePlacesOrdered" => {
                    params.intermediate_places_ordered =
                        parse_bool("intermediatePlacesOrdered", value)?
                }
                "date" => params.date = text,
                "time" => params.time = text,
                "routerId" => params.router_id = Some(value.to_string()),
                "arriveBy" => params.arrive_by = parse_bool("arriveBy", value)?,
                "wheelchair" => params.wheelchair = parse_bool("wheelchair", value)?,
                "maxWalkDistance" => {
                    params.max_walk_distance = parse_f64("maxWalkDistance", value)?
                }
                "walkSpeed" => params.walk_speed = parse_f64("walkSpeed", value)?,
                "triangleSafetyFactor" => {
                    params.triangle_safety_factor = parse_f64("triangleSafetyFactor", value)?
                }
                "triangleSlopeFactor" => {
                    params.triangle_slope_factor = parse_f64("triangleSlopeFactor", value)?
                }
                "triangleTimeFactor" => {
                    params.triangle_time_factor = parse_f64("triangleTimeFactor", value)?
                }
                "optimize" => params.optimize = text,
                "mode" | "modes" => params.modes = text,
                "minTransferTime" => {
                    params.min_transfer_time = parse_i32("minTransferTime", value)?
                }
                "numItineraries" => params.num_itineraries = parse_i32("numItineraries", value)?,
                "preferredRoutes" => params.preferred_routes = text,
                "unpreferredRoutes" => params.unpreferred_routes = text,
                "bannedRoutes" => params.banned_routes = text,
                "showIntermediateStops" => {
                    params.show_intermediate_stops = parse_bool("showIntermediateStops", value)?
                }
                "transferPenalty" => {
                    params.transfer_penalty = parse_i32("transferPenalty", value)?
                }
                "maxTransfers" => params.max_transfers = parse_i32("maxTransfers", value)?,
                _ => {}
            }
        }

        Ok(params)
    }
}

fn parse_bool(field: &'static str, value: &str) -> Result<Option<bool>, ParameterError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(ParameterError::malformed(field, value, "expected true or false")),
    }
}

fn parse_f64(field: &'static str, value: &str) -> Result<Option<f64>, ParameterError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(ParameterError::malformed(field, value, "must be finite")),
        Err(e) => Err(ParameterError::malformed(field, value, e)),
    }
}

fn parse_i32(field: &'static str, value: &str) -> Result<Option<i32>, ParameterError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i32>()
        .map(Some)
        .map_err(|e| ParameterError::malformed(field, value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_intermediate_places_accumulate() {
        let params = QueryParams::from_pairs([
            ("intermediatePlaces", "40.0,-74.0"),
            ("intermediatePlaces", "40.2,-74.2"),
        ])
        .unwrap();
        assert_eq!(params.intermediate_places, vec!["40.0,-74.0", "40.2,-74.2"]);
    }

    #[test]
    fn empty_values_leave_fields_unset() {
        let params = QueryParams::from_pairs([
            ("walkSpeed", ""),
            ("numItineraries", " "),
            ("arriveBy", ""),
            ("optimize", ""),
        ])
        .unwrap();
        assert_eq!(params.walk_speed, None);
        assert_eq!(params.num_itineraries, None);
        assert_eq!(params.arrive_by, None);
        assert_eq!(params.optimize, None);
    }

    #[test]
    fn malformed_numbers_name_the_field() {
        let err = QueryParams::from_pairs([("walkSpeed", "fast")]).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::Malformed {
                field: "walkSpeed",
                ..
            }
        ));

        let err = QueryParams::from_pairs([("maxWalkDistance", "inf")]).unwrap_err();
        assert!(err.to_string().contains("must be finite"));
    }

    #[test]
    fn malformed_bool() {
        let err = QueryParams::from_pairs([("wheelchair", "yes")]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid wheelchair 'yes': expected true or false"
        );
    }

    #[test]
    fn mode_alias() {
        let params = QueryParams::from_pairs([("mode", "WALK,FLEX")]).unwrap();
        assert_eq!(params.modes.as_deref(), Some("WALK,FLEX"));
    }

    #[test]
    fn unknown_keys_ignored() {
        let params = QueryParams::from_pairs([("locale", "en"), ("fromPlace", "a")]).unwrap();
        assert_eq!(params.from_place.as_deref(), Some("a"));
    }

    #[test]
    fn deserialize_from_json() {
        let params: QueryParams = serde_json::from_str(
            r#"{
                "fromPlace": "40.0,-74.0",
                "toPlace": "40.1,-74.1",
                "triangleSafetyFactor": 0.5,
                "mode": "BICYCLE"
            }"#,
        )
        .unwrap();
        assert_eq!(params.from_place.as_deref(), Some("40.0,-74.0"));
        assert_eq!(params.triangle_safety_factor, Some(0.5));
        assert_eq!(params.modes.as_deref(), Some("BICYCLE"));
        assert!(params.intermediate_places.is_empty());
    }
}
