//! Loaded transit data.
//!
//! Feeds are read from JSON snapshots into immutable [`TransitData`], one
//! per router, and shared between requests through a [`RouterRegistry`].

mod data;
mod error;
mod feed;
mod registry;

pub use data::{TransitData, TransitDataBuilder};
pub use error::DataError;
pub use feed::{
    CalendarRecord, FeedSnapshot, ScheduleRecord, ScheduledStopRecord, StopRecord, TripRecord,
    WindowStopRecord, load_feed,
};
pub use registry::{DEFAULT_ROUTER, RouterRegistry};
