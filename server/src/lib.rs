//! geoquery Server Library
//!
//! HTTP facade over a PostGIS database: centroid and intersection queries on
//! client-supplied GeoJSON. Exported for integration tests and the binary.

pub mod config;
pub mod db;
pub mod geometry;
pub mod server;


// Re-export commonly used types
pub use config::Config;
pub use db::{PostgisStore, SpatialStore, StoreError};
pub use geometry::geometry_routes;
pub use server::{AppState, build_app};
