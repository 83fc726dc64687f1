//! Application state for the web layer.

use std::sync::Arc;

use crate::flex::DirectDistanceCalculator;
use crate::request::RequestValidator;
use crate::transit::RouterRegistry;

/// Shared application state.
///
/// Everything here is immutable after startup, so cloning the state per
/// request only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    /// Loaded transit data, one entry per router
    pub registry: Arc<RouterRegistry>,

    /// Query parameter validation
    pub validator: Arc<RequestValidator>,

    /// Ride estimates for flexible trips
    pub calculator: Arc<DirectDistanceCalculator>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        registry: RouterRegistry,
        validator: RequestValidator,
        calculator: DirectDistanceCalculator,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            validator: Arc::new(validator),
            calculator: Arc::new(calculator),
        }
    }
}
