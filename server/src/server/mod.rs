//! Application state and router assembly

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::SpatialStore;
use crate::geometry::{ErrorDetail, geometry_routes};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Spatial engine owning the database connection
    pub store: Arc<dyn SpatialStore>,
    /// How much engine error text reaches clients
    pub error_detail: ErrorDetail,
    /// Renders the installed Prometheus recorder, if any
    pub prometheus: Option<PrometheusHandle>,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn SpatialStore>) -> Self {
        Self {
            store,
            error_detail: ErrorDetail::default(),
            prometheus: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_error_detail(mut self, error_detail: ErrorDetail) -> Self {
        self.error_detail = error_detail;
        self
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub uptime_seconds: u64,
}

/// GET /health - Report whether the database connection still answers
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ready = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check ping failed: {}", e);
            false
        }
    };

    let (http_status, status, database) = if db_ready {
        (StatusCode::OK, "healthy", "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database,
            uptime_seconds: state.uptime_seconds(),
        }),
    )
}

/// GET /metrics/prometheus - Metrics in Prometheus text format
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match state.prometheus {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Build the full application router: geometry API, health, metrics, tracing and CORS
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/metrics/prometheus", get(prometheus_metrics))
        .merge(geometry_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
