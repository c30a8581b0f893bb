//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use geoquery_server::geometry::ErrorDetail;
use geoquery_server::{AppState, SpatialStore, StoreError, build_app};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::util::ServiceExt;

/// Stand-in for a PostGIS database holding a handful of axis-aligned
/// reference rectangles.
///
/// Understands only `Point` and `Polygon` inputs; anything else fails the way
/// the engine does on unparseable GeoJSON.
pub struct FakeEngine {
    /// Reference rectangles as (min_x, min_y, max_x, max_y)
    rectangles: Vec<(f64, f64, f64, f64)>,
    pub queries: AtomicUsize,
}

impl FakeEngine {
    pub fn new(rectangles: Vec<(f64, f64, f64, f64)>) -> Self {
        Self {
            rectangles,
            queries: AtomicUsize::new(0),
        }
    }

    /// Two disjoint unit-ish squares, at the origin and at (10, 10)
    pub fn with_default_rectangles() -> Self {
        Self::new(vec![(0.0, 0.0, 2.0, 2.0), (10.0, 10.0, 12.0, 12.0)])
    }

    fn bbox(geometry: &Value) -> Result<(f64, f64, f64, f64), StoreError> {
        let invalid =
            || StoreError::Database(sqlx::Error::Protocol("unknown GeoJSON type".to_string()));
        let points: Vec<&Value> = match geometry["type"].as_str() {
            Some("Point") => vec![&geometry["coordinates"]],
            Some("Polygon") => geometry["coordinates"][0]
                .as_array()
                .ok_or_else(invalid)?
                .iter()
                .collect(),
            _ => return Err(invalid()),
        };

        let mut bbox = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in points {
            let x = p[0].as_f64().ok_or_else(invalid)?;
            let y = p[1].as_f64().ok_or_else(invalid)?;
            bbox = (bbox.0.min(x), bbox.1.min(y), bbox.2.max(x), bbox.3.max(y));
        }
        Ok(bbox)
    }

    fn rectangle(r: &(f64, f64, f64, f64)) -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[r.0, r.1], [r.2, r.1], [r.2, r.3], [r.0, r.3], [r.0, r.1]]]
        })
    }
}

#[async_trait]
impl SpatialStore for FakeEngine {
    async fn centroid(&self, geometry: &Value) -> Result<Option<Value>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let (min_x, min_y, max_x, max_y) = Self::bbox(geometry)?;
        Ok(Some(json!({
            "type": "Point",
            "coordinates": [(min_x + max_x) / 2.0, (min_y + max_y) / 2.0]
        })))
    }

    async fn intersecting(&self, geometry: &Value) -> Result<Vec<Value>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let (min_x, min_y, max_x, max_y) = Self::bbox(geometry)?;
        Ok(self
            .rectangles
            .iter()
            .filter(|r| min_x <= r.2 && r.0 <= max_x && min_y <= r.3 && r.1 <= max_y)
            .map(Self::rectangle)
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Create a test application router over the given engine
pub fn create_test_app(engine: Arc<FakeEngine>, error_detail: ErrorDetail) -> Router {
    build_app(AppState::new(engine).with_error_detail(error_detail))
}

/// POST a JSON body and return the status and parsed response
pub async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
