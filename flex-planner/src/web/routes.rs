//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tracing::{debug, error, warn};

use crate::domain::TraverseMode;
use crate::error::PlannerError;
use crate::request::{ParameterError, QueryParams, Request};
use crate::transit::{DataError, TransitData};

use super::dto::*;
use super::state::AppState;

/// Walking speed used when a request does not set one, in m/s.
const DEFAULT_WALK_SPEED: f64 = 1.33;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan", get(plan))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Validate a plan request and find the flexible rides around it.
async fn plan(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PlanResponse>, AppError> {
    Ok(Json(plan_request(&state, &pairs)?))
}

fn plan_request(state: &AppState, pairs: &[(String, String)]) -> Result<PlanResponse, PlannerError> {
    let params = QueryParams::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
    let request = state.validator.validate(&params)?;
    let data = state.registry.get(request.router_id())?;

    let (access, egress) = if request.modes().contains(TraverseMode::Flex) {
        flex_rides(state, &data, &request)
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(PlanResponse {
        request,
        access,
        egress,
    })
}

/// Access rides leaving the origin at the requested time, or egress rides
/// reaching the destination by it for arrive-by requests.
fn flex_rides(
    state: &AppState,
    data: &TransitData,
    request: &Request,
) -> (Vec<AccessResult>, Vec<EgressResult>) {
    let walk_speed = request.walk_speed().unwrap_or(DEFAULT_WALK_SPEED);
    let calculator = state.calculator.as_ref();

    if request.arrive_by() {
        let Some(point) = request.to().point() else {
            return (Vec::new(), Vec::new());
        };
        let nearby = data.nearby_stops(point, request.max_walk_distance(), walk_speed);
        let egress = data
            .flex_egress_templates(&nearby, request.date_time(), calculator)
            .iter()
            .map(EgressResult::from_template)
            .collect();
        (Vec::new(), egress)
    } else {
        let Some(point) = request.from().point() else {
            return (Vec::new(), Vec::new());
        };
        let nearby = data.nearby_stops(point, request.max_walk_distance(), walk_speed);
        let access = data
            .flex_access_templates(&nearby, request.date_time(), calculator)
            .iter()
            .map(AccessResult::from_template)
            .collect();
        (access, Vec::new())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ParameterError> for AppError {
    fn from(e: ParameterError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<DataError> for AppError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::RouterNotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<PlannerError> for AppError {
    fn from(e: PlannerError) -> Self {
        match e {
            PlannerError::Parameter(e) => e.into(),
            PlannerError::Data(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => {
                debug!(%message, "rejected request");
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::NotFound { message } => {
                warn!(%message, "not found");
                (StatusCode::NOT_FOUND, message)
            }
            AppError::Internal { message } => {
                error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
