use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Listener of the REST gateway.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// `HOST` (default `0.0.0.0`) and `PORT` (default `8080`).
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string()),
            port: env_parse("PORT", 8080)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}

/// Listener of the gRPC server.
#[derive(Clone, Debug)]
pub struct GrpcServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on a single request, enforced by the server.
    pub request_timeout: Duration,
}

impl GrpcServerConfig {
    /// "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Address a local client dials; the unspecified address becomes loopback.
    pub fn client_endpoint(&self) -> String {
        let host = if self.host == Ipv4Addr::UNSPECIFIED.to_string() {
            Ipv4Addr::LOCALHOST.to_string()
        } else {
            self.host.clone()
        };
        format!("http://{}:{}", host, self.port)
    }
}

impl FromEnv for GrpcServerConfig {
    /// `GRPC_HOST` (default `0.0.0.0`), `GRPC_PORT` (default `50051`) and
    /// `GRPC_REQUEST_TIMEOUT_SECS` (default `30`).
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_or_default("GRPC_HOST", &Ipv4Addr::UNSPECIFIED.to_string()),
            port: env_parse("GRPC_PORT", 50051)?,
            request_timeout: Duration::from_secs(env_parse("GRPC_REQUEST_TIMEOUT_SECS", 30)?),
        })
    }
}

impl Default for GrpcServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 50051,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "0.0.0.0:8080");
        });
    }

    #[test]
    fn test_server_config_custom_values() {
        temp_env::with_vars([("HOST", Some("127.0.0.1")), ("PORT", Some("3000"))], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "127.0.0.1:3000");
        });
    }

    #[test]
    fn test_server_config_port_out_of_range() {
        temp_env::with_var("PORT", Some("99999"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
    }

    #[test]
    fn test_grpc_config_defaults() {
        temp_env::with_vars(
            [
                ("GRPC_HOST", None::<&str>),
                ("GRPC_PORT", None::<&str>),
                ("GRPC_REQUEST_TIMEOUT_SECS", None::<&str>),
            ],
            || {
                let config = GrpcServerConfig::from_env().unwrap();
                assert_eq!(config.address(), "0.0.0.0:50051");
                assert_eq!(config.request_timeout, Duration::from_secs(30));
                assert_eq!(config.client_endpoint(), "http://127.0.0.1:50051");
            },
        );
    }

    #[test]
    fn test_grpc_config_custom_host_is_dialed_as_is() {
        temp_env::with_vars(
            [("GRPC_HOST", Some("users.internal")), ("GRPC_PORT", Some("6000"))],
            || {
                let config = GrpcServerConfig::from_env().unwrap();
                assert_eq!(config.client_endpoint(), "http://users.internal:6000");
            },
        );
    }

    #[test]
    fn test_grpc_config_invalid_timeout() {
        temp_env::with_var("GRPC_REQUEST_TIMEOUT_SECS", Some("soon"), || {
            let err = GrpcServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("GRPC_REQUEST_TIMEOUT_SECS"));
        });
    }
}
