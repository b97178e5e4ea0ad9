use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::{DatabaseError, DatabaseResult};

/// Budget for a single probe.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    /// Output of `SELECT VERSION()`.
    pub version: String,
}

/// Pings the pool, then reads the server version.
pub async fn check_health(db: &DatabaseConnection) -> DatabaseResult<HealthReport> {
    check_health_with_timeout(db, HEALTH_CHECK_TIMEOUT).await
}

pub async fn check_health_with_timeout(
    db: &DatabaseConnection,
    timeout: Duration,
) -> DatabaseResult<HealthReport> {
    tokio::time::timeout(timeout, probe(db))
        .await
        .map_err(|_| DatabaseError::HealthCheckTimeout(timeout))?
}

async fn probe(db: &DatabaseConnection) -> DatabaseResult<HealthReport> {
    db.ping()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("ping: {e}")))?;

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT VERSION() AS version");
    let row = db
        .query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("query version: {e}")))?
        .ok_or_else(|| DatabaseError::HealthCheckFailed("query version: no row".to_string()))?;
    let version: String = row
        .try_get("", "version")
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("query version: {e}")))?;

    debug!(%version, "PostgreSQL health check passed");
    Ok(HealthReport { version })
}
