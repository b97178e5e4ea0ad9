/// Failure while probing the store.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Health check timed out after {0:?}")]
    HealthCheckTimeout(std::time::Duration),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
