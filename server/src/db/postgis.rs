//! PostGIS-backed spatial store

use std::future::Future;
use std::str::FromStr;
use std::time::Instant;

use async_trait::async_trait;
use metrics::histogram;
use serde_json::Value;
use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

use super::connect::{RetryPolicy, connect_with_retry};
use super::store::SpatialStore;
use super::types::{StartupError, StoreError};

const CENTROID_SQL: &str =
    "SELECT ST_AsGeoJSON(ST_Centroid(ST_GeomFromGeoJSON($1))) AS centroid";

/// Spatial store over a single long-lived PostgreSQL connection.
///
/// Concurrent requests take turns on the connection; there is no pool and no
/// reconnection once the connection drops.
pub struct PostgisStore {
    conn: Mutex<PgConnection>,
    intersect_sql: String,
}

impl PostgisStore {
    /// Wrap an open connection. `reference_table` must already be validated
    /// as an SQL identifier.
    pub fn new(conn: PgConnection, reference_table: &str) -> Self {
        Self {
            conn: Mutex::new(conn),
            intersect_sql: format!(
                "SELECT ST_AsGeoJSON(geom) AS geojson FROM {reference_table} \
                 WHERE ST_Intersects(ST_GeomFromGeoJSON($1), geom)"
            ),
        }
    }
}

/// Open the database connection described by `config`, retrying per its policy
pub async fn connect_postgis(config: &DatabaseConfig) -> Result<PostgisStore, StartupError> {
    let options = PgConnectOptions::from_str(&config.url)
        .map_err(|e| StartupError::InvalidDatabaseUrl(e.to_string()))?;

    info!(
        "Database target: {}:{}/{}",
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or("<default>")
    );

    let policy = RetryPolicy::from(config);
    let conn = connect_with_retry(&policy, || PgConnection::connect_with(&options)).await?;

    Ok(PostgisStore::new(conn, &config.reference_table))
}

/// Run a query, recording its duration whether it succeeds or fails
async fn timed<T>(endpoint: &'static str, query: impl Future<Output = T>) -> T {
    let start = Instant::now();
    let result = query.await;
    histogram!("geoquery_query_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed());
    result
}

#[async_trait]
impl SpatialStore for PostgisStore {
    async fn centroid(&self, geometry: &Value) -> Result<Option<Value>, StoreError> {
        let row = timed("find_centroid", async {
            let mut conn = self.conn.lock().await;
            sqlx::query_scalar::<_, Option<String>>(CENTROID_SQL)
                .bind(geometry.to_string())
                .fetch_optional(&mut *conn)
                .await
        })
        .await?;

        match row.flatten() {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => {
                debug!("Centroid query returned no value");
                Ok(None)
            }
        }
    }

    async fn intersecting(&self, geometry: &Value) -> Result<Vec<Value>, StoreError> {
        let rows = timed("check_intersection", async {
            let mut conn = self.conn.lock().await;
            sqlx::query_scalar::<_, String>(&self.intersect_sql)
                .bind(geometry.to_string())
                .fetch_all(&mut *conn)
                .await
        })
        .await?;

        debug!("Intersection query matched {} polygon(s)", rows.len());
        rows.iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.lock().await;
        conn.ping().await?;
        Ok(())
    }
}
