//! SpatialStore trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::types::StoreError;

/// Trait for spatial engines answering geometry queries.
///
/// Geometries go in and come out as GeoJSON; all geometric work happens in
/// the engine.
#[async_trait]
pub trait SpatialStore: Send + Sync {
    /// Centroid of `geometry`, or `None` when the engine produced no value
    async fn centroid(&self, geometry: &Value) -> Result<Option<Value>, StoreError>;

    /// Reference polygons intersecting `geometry`, in engine order
    async fn intersecting(&self, geometry: &Value) -> Result<Vec<Value>, StoreError>;

    /// Check the engine is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
