//! PostgreSQL connector, pool configuration and health probe.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use health::{HEALTH_CHECK_TIMEOUT, HealthReport, check_health, check_health_with_timeout};

pub use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
