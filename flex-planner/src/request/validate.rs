//! Turning raw parameters into a canonical request.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::domain::{ModeSet, Place};

use super::{OptimizeType, ParameterError, QueryParams, Request, TriangleFactors, ValidatorConfig};

/// Date formats accepted for the `date` parameter.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m-%d-%Y", "%Y%m%d"];

/// Time formats accepted for the `time` parameter.
const TIME_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M%p", "%I:%M %p"];

/// Validates search parameters and builds [`Request`]s.
///
/// Validation applies defaults, clamps counts to their allowed ranges,
/// and checks the cross-field rules for triangle optimization. It runs
/// once per query, before any search.
///
/// # Examples
///
/// ```
/// use flex_planner::request::{OptimizeType, QueryParams, RequestValidator};
///
/// let validator = RequestValidator::default();
/// let request = validator
///     .validate(&QueryParams::new("40.0,-74.0", "40.1,-74.1"))
///     .unwrap();
///
/// assert_eq!(request.optimize(), OptimizeType::Quick);
/// assert_eq!(request.num_itineraries(), 3);
/// assert_eq!(request.max_walk_distance(), 800.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestValidator {
    config: ValidatorConfig,
}

impl RequestValidator {
    /// Create a validator with the given limits and defaults.
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Returns the validator's configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate parameters, resolving a missing date or time to now.
    pub fn validate(&self, params: &QueryParams) -> Result<Request, ParameterError> {
        self.validate_at(params, Local::now().naive_local())
    }

    /// Validate parameters, resolving a missing date or time against `now`.
    pub fn validate_at(
        &self,
        params: &QueryParams,
        now: NaiveDateTime,
    ) -> Result<Request, ParameterError> {
        let result = self.build(params, now);
        match &result {
            Ok(request) => debug!(
                from = %request.from(),
                to = %request.to(),
                optimize = %request.optimize(),
                modes = %request.modes(),
                "validated search request"
            ),
            Err(e) => debug!(error = %e, "rejected search parameters"),
        }
        result
    }

    fn build(&self, params: &QueryParams, now: NaiveDateTime) -> Result<Request, ParameterError> {
        let config = &self.config;

        let from = parse_place("fromPlace", params.from_place.as_deref())?;
        let to = parse_place("toPlace", params.to_place.as_deref())?;
        let date_time = parse_date_time(params.date.as_deref(), params.time.as_deref(), now)?;

        let num_itineraries = params
            .num_itineraries
            .unwrap_or(config.default_num_itineraries)
            .clamp(1, config.max_itineraries.max(1));

        let (optimize, triangle) = self.resolve_triangle(params)?;

        // Replace the deprecated objective with its modern equivalent
        let mut transfer_penalty = params.transfer_penalty.unwrap_or(0);
        let optimize = if optimize == OptimizeType::Transfers {
            transfer_penalty = transfer_penalty.saturating_add(config.legacy_transfers_penalty);
            OptimizeType::Quick
        } else {
            optimize
        };

        let intermediate_places = match params.intermediate_places.first() {
            Some(first) if !first.trim().is_empty() => params
                .intermediate_places
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| parse_place("intermediatePlaces", Some(p)))
                .collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };

        let modes = match params.modes.as_deref() {
            Some(text) => {
                let modes =
                    ModeSet::parse(text).map_err(|e| ParameterError::malformed("modes", text, e))?;
                if modes.is_empty() {
                    return Err(ParameterError::malformed("modes", text, "no modes given"));
                }
                modes
            }
            None => config.default_modes,
        };

        let max_transfers = params
            .max_transfers
            .map(|n| n.min(config.max_transfers))
            .unwrap_or(config.default_max_transfers);

        Ok(Request {
            router_id: params.router_id.clone().unwrap_or_default(),
            from,
            to,
            intermediate_places,
            intermediate_places_ordered: params.intermediate_places_ordered.unwrap_or(false),
            date_time,
            arrive_by: params.arrive_by.unwrap_or(false),
            wheelchair: params.wheelchair.unwrap_or(false),
            max_walk_distance: params
                .max_walk_distance
                .unwrap_or(config.default_max_walk_distance),
            walk_speed: params.walk_speed,
            triangle,
            optimize,
            modes,
            min_transfer_time: params
                .min_transfer_time
                .unwrap_or(config.default_min_transfer_time),
            num_itineraries,
            preferred_routes: parse_route_list(params.preferred_routes.as_deref()),
            unpreferred_routes: parse_route_list(params.unpreferred_routes.as_deref()),
            banned_routes: parse_route_list(params.banned_routes.as_deref()),
            show_intermediate_stops: params.show_intermediate_stops.unwrap_or(false),
            transfer_penalty,
            max_transfers,
        })
    }

    /// Work out the objective and triangle weights together.
    ///
    /// Triangle weights and optimize=TRIANGLE go together: both or neither.
    /// An unset objective is inferred from the presence of weights.
    fn resolve_triangle(
        &self,
        params: &QueryParams,
    ) -> Result<(OptimizeType, Option<TriangleFactors>), ParameterError> {
        let optimize = params
            .optimize
            .as_deref()
            .map(|text| {
                text.parse::<OptimizeType>()
                    .map_err(|e| ParameterError::malformed("optimize", text, e))
            })
            .transpose()?;

        let factors = (
            params.triangle_safety_factor,
            params.triangle_slope_factor,
            params.triangle_time_factor,
        );

        match factors {
            (None, None, None) => match optimize {
                Some(OptimizeType::Triangle) => Err(ParameterError::TriangleValuesNotSet),
                Some(other) => Ok((other, None)),
                None => Ok((OptimizeType::Quick, None)),
            },
            (Some(safety), Some(slope), Some(time)) => {
                let optimize = optimize.unwrap_or(OptimizeType::Triangle);
                if optimize != OptimizeType::Triangle {
                    return Err(ParameterError::TriangleOptimizeTypeMismatch(optimize));
                }

                for (field, value) in [
                    ("triangleSafetyFactor", safety),
                    ("triangleSlopeFactor", slope),
                    ("triangleTimeFactor", time),
                ] {
                    if !(0.0..=1.0).contains(&value) {
                        return Err(ParameterError::TriangleFactorOutOfRange { field, value });
                    }
                }

                let sum = safety + slope + time;
                if (sum - 1.0).abs() > self.config.triangle_tolerance {
                    return Err(ParameterError::TriangleNotAffine { sum });
                }

                Ok((
                    optimize,
                    Some(TriangleFactors {
                        safety,
                        slope,
                        time,
                    }),
                ))
            }
            _ => Err(ParameterError::UnderspecifiedTriangle),
        }
    }
}

fn parse_place(field: &'static str, text: Option<&str>) -> Result<Place, ParameterError> {
    let text = text.ok_or(ParameterError::MissingParameter(field))?;
    Place::parse(text).map_err(|e| ParameterError::malformed(field, text, e))
}

/// Parse a comma-separated route list; absent or empty text means no routes.
fn parse_route_list(text: Option<&str>) -> Vec<String> {
    match text {
        Some(text) if !text.is_empty() => text
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_date_time(
    date: Option<&str>,
    time: Option<&str>,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, ParameterError> {
    let date = match date {
        Some(text) => parse_date(text)?,
        None => now.date(),
    };
    let time = match time {
        Some(text) => parse_time(text)?,
        None => now.time(),
    };
    Ok(date.and_time(time))
}

fn parse_date(text: &str) -> Result<NaiveDate, ParameterError> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            ParameterError::malformed("date", text, "expected YYYY-MM-DD, MM-DD-YYYY or YYYYMMDD")
        })
}

fn parse_time(text: &str) -> Result<NaiveTime, ParameterError> {
    let trimmed = text.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ParameterError::malformed("time", text, "expected HH:MM[:SS] or h:MMam/pm"))
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
