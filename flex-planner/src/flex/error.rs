//! Flexible trip construction errors.

use super::StopIndex;

/// A flexible trip's stop times are inconsistent.
///
/// Raised once when the trip is built; a trip that exists is valid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlexTripError {
    /// Fewer than two stops, so nothing can be boarded and then alighted
    #[error("a flex trip needs at least two stops, got {0}")]
    TooFewStops(usize),

    /// A scheduled time is earlier than one before it
    #[error("stop times go backwards at stop {0}")]
    TimesNotIncreasing(StopIndex),

    /// A scheduled trip without a single time
    #[error("a scheduled trip needs at least one time")]
    NoTimes,

    /// A service window ends before it starts
    #[error("service window ends before it starts at stop {0}")]
    InvertedWindow(StopIndex),

    /// A negative maximum ride duration
    #[error("maximum ride duration must not be negative, got {0}s")]
    NegativeMaxRide(i32),
}
