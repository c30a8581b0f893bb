//! Request/response types for the geometry API

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CENTROID_OK: &str = "Centroid calculated successfully";
pub const CENTROID_EMPTY: &str = "Unable to calculate centroid";
pub const INTERSECT_SOME: &str = "The polygons intersect";
pub const INTERSECT_NONE: &str = "The polygons do not intersect";
pub const MISSING_GEOMETRY: &str = "Missing geometry";

const REDACTED_DETAIL: &str = "internal database error";

/// Body of both geometry endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct GeometryRequest {
    /// GeoJSON geometry, forwarded to the engine as-is
    #[serde(default)]
    pub geometry: Option<Value>,
}

/// Response for POST /find-centroid
#[derive(Debug, Serialize, Deserialize)]
pub struct CentroidResponse {
    pub message: String,
    pub centroid: Value,
}

/// Response for POST /check-intersection
#[derive(Debug, Serialize, Deserialize)]
pub struct IntersectionResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intersections: Option<Vec<Value>>,
}

/// How much of an engine error is echoed back to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDetail {
    /// Pass the engine message through unchanged
    #[default]
    Verbatim,
    /// Replace the engine message with a generic one
    Redacted,
}

impl ErrorDetail {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "verbatim" => Some(Self::Verbatim),
            "redacted" => Some(Self::Redacted),
            _ => None,
        }
    }

    pub fn render<'a>(&self, detail: &'a str) -> &'a str {
        match self {
            Self::Verbatim => detail,
            Self::Redacted => REDACTED_DETAIL,
        }
    }
}

/// Error responses of the geometry API.
///
/// Client-side problems carry a `message`, engine failures an `error`.
#[derive(Debug)]
pub enum GeometryApiError {
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for GeometryApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(MessageBody { message })).into_response()
            }
            Self::Internal(error) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error })).into_response()
            }
        }
    }
}
