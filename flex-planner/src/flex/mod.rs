//! Flexible (demand-responsive) transit.
//!
//! Flexible trips do not simply call at stops at fixed times. Some deviate
//! from a route into zones, taking their times from a published schedule;
//! others run entirely on demand within service windows. This module models
//! both behind [`FlexTrip`] and generates the access and egress templates a
//! search uses to start or end a journey with a flexible ride.

mod distance;
mod error;
mod scheduled;
mod template;
mod trip;
mod unscheduled;

#[cfg(test)]
pub(crate) mod test_support;

pub use distance::{DirectDistanceCalculator, DistanceCalculator, FlexPath};
pub use error::FlexTripError;
pub use scheduled::{ScheduledDeviatedTrip, ScheduledStopTime};
pub use template::{
    FlexAccessTemplate, FlexAccessTemplates, FlexEgressTemplate, FlexEgressTemplates, NearbyStop,
};
pub use trip::{FlexTrip, StopIndex};
pub use unscheduled::{UnscheduledTrip, WindowStopTime};
