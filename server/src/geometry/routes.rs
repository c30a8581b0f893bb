//! HTTP route handlers for the geometry API

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use metrics::counter;
use serde_json::Value;

use crate::server::AppState;

use super::types::{
    CENTROID_EMPTY, CENTROID_OK, CentroidResponse, GeometryApiError, GeometryRequest,
    INTERSECT_NONE, INTERSECT_SOME, IntersectionResponse, MISSING_GEOMETRY,
};

fn record(endpoint: &'static str, outcome: &'static str) {
    counter!("geoquery_requests_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
}

/// Pull the geometry out of a request body, rejecting anything unusable
fn extract_geometry(
    body: Result<Json<GeometryRequest>, JsonRejection>,
) -> Result<Value, GeometryApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!("Rejected request body: {}", e.body_text());
        GeometryApiError::BadRequest(format!("Invalid request body: {}", e.body_text()))
    })?;

    // `null` deserializes to `None` as well
    request
        .geometry
        .ok_or_else(|| GeometryApiError::BadRequest(MISSING_GEOMETRY.to_string()))
}

/// POST /find-centroid - Centroid of the supplied geometry
pub async fn find_centroid(
    State(state): State<AppState>,
    body: Result<Json<GeometryRequest>, JsonRejection>,
) -> Result<Json<CentroidResponse>, GeometryApiError> {
    let geometry =
        extract_geometry(body).inspect_err(|_| record("find_centroid", "bad_request"))?;

    match state.store.centroid(&geometry).await {
        Ok(Some(centroid)) => {
            record("find_centroid", "ok");
            Ok(Json(CentroidResponse {
                message: CENTROID_OK.to_string(),
                centroid,
            }))
        }
        Ok(None) => {
            tracing::warn!("Engine produced no centroid for {}", geometry);
            record("find_centroid", "empty");
            Err(GeometryApiError::BadRequest(CENTROID_EMPTY.to_string()))
        }
        Err(e) => {
            tracing::error!("Error querying the database for centroid: {}", e);
            record("find_centroid", "error");
            let detail = e.detail();
            Err(GeometryApiError::Internal(format!(
                "Error calculating centroid: {}",
                state.error_detail.render(&detail)
            )))
        }
    }
}

/// POST /check-intersection - Reference polygons intersecting the supplied geometry
pub async fn check_intersection(
    State(state): State<AppState>,
    body: Result<Json<GeometryRequest>, JsonRejection>,
) -> Result<Json<IntersectionResponse>, GeometryApiError> {
    let geometry =
        extract_geometry(body).inspect_err(|_| record("check_intersection", "bad_request"))?;

    let intersections = state.store.intersecting(&geometry).await.map_err(|e| {
        tracing::error!("Error querying the database for intersections: {}", e);
        record("check_intersection", "error");
        let detail = e.detail();
        GeometryApiError::Internal(format!(
            "Error checking intersection: {}",
            state.error_detail.render(&detail)
        ))
    })?;

    tracing::debug!("Geometry intersects {} polygon(s)", intersections.len());

    if intersections.is_empty() {
        record("check_intersection", "none");
        return Ok(Json(IntersectionResponse {
            message: INTERSECT_NONE.to_string(),
            intersections: None,
        }));
    }

    record("check_intersection", "some");
    Ok(Json(IntersectionResponse {
        message: INTERSECT_SOME.to_string(),
        intersections: Some(intersections),
    }))
}

/// Build geometry API routes
pub fn geometry_routes() -> Router<AppState> {
    Router::new()
        .route("/find-centroid", post(find_centroid))
        .route("/check-intersection", post(check_intersection))
}
