//! Geometry API
//!
//! Two endpoints that hand a client geometry to the spatial store and reshape
//! its answer:
//! - `POST /find-centroid`
//! - `POST /check-intersection`

pub mod routes;
mod types;

pub use routes::geometry_routes;
pub use types::{
    CentroidResponse, ErrorDetail, GeometryApiError, GeometryRequest, IntersectionResponse,
};
