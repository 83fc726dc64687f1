//! Web layer for the flex planner.
//!
//! Provides HTTP endpoints for checking plan requests and finding the
//! flexible trips that can start or end a journey.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
