//! HTTP route handlers for the pathfinding service.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use pagodapath_lib::{NamedNearbyPoint, PointInfo, ProximityMeasure, DEFAULT_CORRIDOR_RADIUS_KM};

use crate::problem::{from_lib_error, ProblemDetails};
use crate::state::AppState;

/// Request body for `POST /api/v1/path`.
#[derive(Debug, Clone, Deserialize)]
pub struct PathRequest {
    /// Starting point name.
    pub from: String,
    /// Destination point name.
    pub to: String,
    /// Corridor radius for nearby points, in km. Defaults to 1 km.
    #[serde(default)]
    pub nearby_radius_km: Option<f64>,
}

impl PathRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.from.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "Field 'from' must not be empty",
                request_id,
            )));
        }
        if self.to.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "Field 'to' must not be empty",
                request_id,
            )));
        }
        if let Some(radius) = self.nearby_radius_km {
            if !radius.is_finite() || radius < 0.0 {
                return Err(Box::new(ProblemDetails::bad_request(
                    "Field 'nearby_radius_km' must be a non-negative number",
                    request_id,
                )));
            }
        }
        Ok(())
    }
}

/// Route response returned to the caller.
#[derive(Debug, Serialize)]
pub struct PathResponse {
    /// Always `true` on this arm; mirrors the original API shape.
    pub success: bool,
    /// Ordered list of point names from start to goal.
    pub path: Vec<String>,
    /// Total route distance in kilometres.
    pub distance_km: f64,
    /// Number of points on the route.
    pub path_length: usize,
    /// Off-route points within the corridor radius, nearest first.
    pub nearby_points: Vec<NamedNearbyPoint>,
}

/// HTTP response - either success or RFC 9457 error.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Response {
    Success(PathResponse),
    Error(ProblemDetails),
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        match self {
            Response::Success(data) => (StatusCode::OK, Json(data)).into_response(),
            Response::Error(problem) => problem.into_response(),
        }
    }
}

/// Health status payload for the probes.
#[derive(Debug, Serialize)]
struct HealthStatus {
    status: String,
    service: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    points_loaded: Option<usize>,
}

/// Build the service router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/path", post(path_handler))
        .route("/api/v1/points", get(points_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle `POST /api/v1/path` requests.
async fn path_handler(State(state): State<AppState>, Json(request): Json<PathRequest>) -> Response {
    let request_id = generate_request_id();

    info!(
        request_id = %request_id,
        from = %request.from,
        to = %request.to,
        "handling path request"
    );

    if let Err(problem) = request.validate(&request_id) {
        return Response::Error(*problem);
    }

    let pathfinder = state.pathfinder();
    let plan = match pathfinder.find_path(&request.from, &request.to) {
        Ok(Some(plan)) => plan,
        Ok(None) => {
            info!(request_id = %request_id, "no route between requested points");
            return Response::Error(ProblemDetails::route_not_found(
                &request.from,
                &request.to,
                &request_id,
            ));
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "path query failed");
            return Response::Error(from_lib_error(&e, &request_id));
        }
    };

    let radius = request
        .nearby_radius_km
        .unwrap_or(DEFAULT_CORRIDOR_RADIUS_KM);
    let nearby_points = match pathfinder.nearby_along_path(&plan.steps, radius, ProximityMeasure::Vertex)
    {
        Ok(nearby) => nearby,
        Err(e) => {
            // Path names come from the same snapshot that produced the plan,
            // so a resolution failure here means a concurrent reload.
            error!(request_id = %request_id, error = %e, "nearby lookup failed");
            Vec::new()
        }
    };

    info!(
        request_id = %request_id,
        hops = plan.hop_count(),
        distance_km = plan.distance_km,
        nearby = nearby_points.len(),
        "path computed successfully"
    );

    Response::Success(PathResponse {
        success: true,
        path_length: plan.path_length(),
        path: plan.steps,
        distance_km: plan.distance_km,
        nearby_points,
    })
}

/// Handle `GET /api/v1/points` requests.
async fn points_handler(State(state): State<AppState>) -> Json<Vec<PointInfo>> {
    Json(state.pathfinder().list_points())
}

/// Liveness probe: the process is up.
async fn health_live() -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok".to_string(),
        service: "pagodapath",
        points_loaded: None,
    })
}

/// Readiness probe: a dataset is loaded.
async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let points = state.pathfinder().point_count();
    if points == 0 {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "not_ready: no points loaded".to_string(),
                service: "pagodapath",
                points_loaded: Some(0),
            }),
        );
    }
    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            service: "pagodapath",
            points_loaded: Some(points),
        }),
    )
}

/// Generate a unique request ID for tracing.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    format!("req-{:x}", timestamp)
}
