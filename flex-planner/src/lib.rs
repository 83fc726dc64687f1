//! Flexible transit planning server.
//!
//! Validates trip-planning requests and finds the demand-responsive rides
//! (dial-a-ride zones and route deviations) that can start or end a
//! journey, over transit data loaded from JSON feed snapshots.

pub mod config;
pub mod domain;
pub mod error;
pub mod flex;
pub mod request;
pub mod transit;
pub mod web;
