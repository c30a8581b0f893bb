//! Spatial database access
//!
//! This module provides:
//! - `SpatialStore` trait for abstracting the spatial engine
//! - `PostgisStore` running the centroid and intersection queries over one
//!   PostgreSQL connection
//! - `connect_with_retry` for bounded startup connection attempts

mod connect;
mod postgis;
mod store;
mod types;

pub use connect::{RetryPolicy, connect_with_retry};
pub use postgis::{PostgisStore, connect_postgis};
pub use store::SpatialStore;
pub use types::{StartupError, StoreError};
