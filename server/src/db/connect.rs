//! Bounded startup connection attempts

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::config::DatabaseConfig;

use super::types::StartupError;

/// How often and how patiently to try connecting at startup
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Fixed wait between attempts (no growth, no jitter)
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(5),
        }
    }
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: config.backoff,
        }
    }
}

/// Run `connect` until it succeeds or the policy's attempts are used up.
///
/// Every attempt and the final outcome are logged. A `max_attempts` of 0 still
/// makes one attempt.
pub async fn connect_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut connect: F,
) -> Result<T, StartupError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        info!(
            "Connecting to the database (attempt {}/{})",
            attempts, max_attempts
        );

        match connect().await {
            Ok(conn) => {
                info!("Connected to the database after {} attempt(s)", attempts);
                return Ok(conn);
            }
            Err(e) => {
                warn!("Connection attempt {} failed: {}", attempts, e);
                if attempts >= max_attempts {
                    error!("Max retries reached, giving up on the database");
                    return Err(StartupError::RetriesExhausted {
                        attempts,
                        last_error: e.to_string(),
                    });
                }
                tokio::time::sleep(policy.backoff).await;
            }
        }
    }
}
