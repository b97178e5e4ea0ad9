use std::fmt;
use std::str::FromStr;

use core_config::{ConfigError, Environment, FromEnv, GrpcServerConfig, ServerConfig, env_parse};
use database::postgres::PostgresConfig;

/// Which [`domain_users::UserNotifier`] the server wires in (`USER_NOTIFIER`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotifierKind {
    #[default]
    Noop,
    Log,
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "noop" | "none" => Ok(NotifierKind::Noop),
            "log" => Ok(NotifierKind::Log),
            other => Err(format!("unknown notifier '{other}', expected noop or log")),
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifierKind::Noop => f.write_str("noop"),
            NotifierKind::Log => f.write_str("log"),
        }
    }
}

/// Everything the service reads from the environment, loaded once at startup.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub environment: Environment,
    pub gateway: ServerConfig,
    pub grpc: GrpcServerConfig,
    pub database: PostgresConfig,
    pub notifier: NotifierKind,
}

impl FromEnv for ServiceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            gateway: ServerConfig::from_env()?,
            grpc: GrpcServerConfig::from_env()?,
            database: PostgresConfig::from_env()?, // Required - fails without DATABASE_URL
            notifier: env_parse("USER_NOTIFIER", NotifierKind::default())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_with_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/users")),
                ("USER_NOTIFIER", None),
                ("PORT", None),
                ("GRPC_PORT", None),
            ],
            || {
                let config = ServiceConfig::from_env().unwrap();
                assert_eq!(config.notifier, NotifierKind::Noop);
                assert_eq!(config.gateway.port, 8080);
                assert_eq!(config.grpc.port, 50051);
            },
        );
    }

    #[test]
    fn test_database_url_is_required() {
        temp_env::with_var_unset("DATABASE_URL", || {
            assert!(matches!(
                ServiceConfig::from_env(),
                Err(ConfigError::MissingEnvVar(_))
            ));
        });
    }

    #[test]
    fn test_notifier_selection() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/users")),
                ("USER_NOTIFIER", Some("LOG")),
            ],
            || {
                assert_eq!(ServiceConfig::from_env().unwrap().notifier, NotifierKind::Log);
            },
        );

        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/users")),
                ("USER_NOTIFIER", Some("kafka")),
            ],
            || {
                assert!(matches!(
                    ServiceConfig::from_env(),
                    Err(ConfigError::ParseError { .. })
                ));
            },
        );
    }
}
