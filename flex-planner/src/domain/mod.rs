//! Domain types for the flex trip planner.
//!
//! This module contains the core value types shared by request validation
//! and flexible trip modelling. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod calendar;
mod id;
mod mode;
mod place;
mod stop;
mod time;
mod trip;

pub use calendar::ServiceCalendar;
pub use id::{FeedScopedId, InvalidFeedScopedId};
pub use mode::{InvalidMode, ModeSet, TraverseMode};
pub use place::{InvalidPlace, Place};
pub use stop::StopLocation;
pub use time::{SECONDS_PER_DAY, ServiceDate, ServiceTime, TimeError};
pub use trip::Trip;
