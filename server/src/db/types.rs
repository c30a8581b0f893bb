//! Database error definitions

use thiserror::Error;

/// Errors raised while running a spatial query
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("engine returned malformed GeoJSON: {0}")]
    MalformedGeoJson(#[from] serde_json::Error),
}

/// Fatal errors while bringing up the database connection
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Could not connect to the database after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl StoreError {
    /// Human-readable engine message, without the driver's own prefix
    pub fn detail(&self) -> String {
        match self {
            StoreError::Database(sqlx::Error::Database(db)) => db.message().to_string(),
            other => other.to_string(),
        }
    }
}
