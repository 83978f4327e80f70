use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use mukka_core::Coordinate;
use mukka_kakao::KakaoError;
use mukka_routes::{PlanError, RouteOption};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PlanRoutesRequest {
    #[serde(default)]
    start: String,
    #[serde(default)]
    destination: String,
    #[serde(default, rename = "startCoords")]
    start_coords: Option<CoordsBody>,
    #[serde(default, rename = "destCoords")]
    dest_coords: Option<CoordsBody>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct CoordsBody {
    lat: f64,
    lng: f64,
}

impl From<CoordsBody> for Coordinate {
    fn from(value: CoordsBody) -> Self {
        Coordinate {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PlanRoutesData {
    routes: Vec<RouteOption>,
}

pub(super) async fn plan_routes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<PlanRoutesRequest>,
) -> Result<Json<ApiResponse<PlanRoutesData>>, ApiError> {
    // An endpoint needs either a non-blank query or explicit coordinates.
    if body.start.trim().is_empty() && body.start_coords.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "start is required",
        ));
    }
    if body.destination.trim().is_empty() && body.dest_coords.is_none() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "destination is required",
        ));
    }

    let origin = state
        .planner
        .resolve_endpoint(body.start.trim(), body.start_coords.map(Coordinate::from))
        .await
        .map_err(|e| map_plan_error(req_id.0.clone(), &e))?;
    let destination = state
        .planner
        .resolve_endpoint(
            body.destination.trim(),
            body.dest_coords.map(Coordinate::from),
        )
        .await
        .map_err(|e| map_plan_error(req_id.0.clone(), &e))?;

    let routes = state
        .planner
        .plan(origin, destination)
        .await
        .map_err(|e| map_plan_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: PlanRoutesData { routes },
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_plan_error(request_id: String, error: &PlanError) -> ApiError {
    match error {
        PlanError::Kakao(KakaoError::UnresolvableLocation(query)) => {
            tracing::info!(query = %query, "location could not be resolved");
            ApiError::new(
                request_id,
                "not_found",
                format!("no location found for '{query}'"),
            )
        }
        PlanError::Kakao(e) => {
            tracing::error!(error = %e, "kakao upstream failed");
            ApiError::new(
                request_id,
                "upstream_unavailable",
                "route provider is unavailable",
            )
        }
        PlanError::Exdata(e) => {
            tracing::error!(error = %e, "open-data upstream failed");
            ApiError::new(
                request_id,
                "upstream_unavailable",
                "rest-area data provider is unavailable",
            )
        }
    }
}
