use std::time::Duration;

use tonic::transport::{Channel, Endpoint};

use crate::error::{GrpcError, GrpcResult};

/// HTTP/2 and TCP settings for a client channel.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
  pub connect_timeout: Duration,
  /// Per-request deadline enforced by the client.
  pub timeout: Duration,
  pub http2_keep_alive_interval: Option<Duration>,
  pub keep_alive_timeout: Duration,
  pub tcp_nodelay: bool,
}

impl Default for ChannelConfig {
  fn default() -> Self {
    Self {
      connect_timeout: Duration::from_secs(5),
      timeout: Duration::from_secs(30),
      http2_keep_alive_interval: Some(Duration::from_secs(30)),
      keep_alive_timeout: Duration::from_secs(10),
      tcp_nodelay: true,
    }
  }
}

impl ChannelConfig {
  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
    self.connect_timeout = timeout;
    self
  }

  fn apply_to_endpoint(self, mut endpoint: Endpoint) -> Endpoint {
    if let Some(interval) = self.http2_keep_alive_interval {
      endpoint = endpoint
        .http2_keep_alive_interval(interval)
        .keep_alive_while_idle(true);
    }
    endpoint
      .keep_alive_timeout(self.keep_alive_timeout)
      .connect_timeout(self.connect_timeout)
      .timeout(self.timeout)
      .tcp_nodelay(self.tcp_nodelay)
  }
}

/// Builds a channel that connects on its first request, so the gateway can
/// start before the gRPC listener is accepting connections.
pub fn create_channel_lazy(addr: impl Into<String>, config: ChannelConfig) -> GrpcResult<Channel> {
  let addr = addr.into();

  let endpoint = Endpoint::from_shared(addr.clone()).map_err(|e| {
    tracing::error!(target: "grpc_client", addr = %addr, error = ?e, "invalid URI");
    GrpcError::InvalidUri(e)
  })?;

  tracing::debug!(target: "grpc_client", addr = %addr, "creating lazy gRPC channel");
  Ok(config.apply_to_endpoint(endpoint).connect_lazy())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = ChannelConfig::default();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.tcp_nodelay);
  }

  #[test]
  fn test_builder() {
    let config = ChannelConfig::default()
      .with_request_timeout(Duration::from_secs(3))
      .with_connect_timeout(Duration::from_secs(1));
    assert_eq!(config.timeout, Duration::from_secs(3));
    assert_eq!(config.connect_timeout, Duration::from_secs(1));
  }

  #[test]
  fn test_invalid_uri() {
    let result = create_channel_lazy("not a valid uri", ChannelConfig::default());
    assert!(matches!(result, Err(GrpcError::InvalidUri(_))));
  }

  #[tokio::test]
  async fn test_lazy_channel_does_not_connect() {
    // Nothing listens here; a lazy channel is still created.
    let result = create_channel_lazy("http://127.0.0.1:1", ChannelConfig::default());
    assert!(result.is_ok());
  }
}
