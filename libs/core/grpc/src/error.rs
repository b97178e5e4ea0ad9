use thiserror::Error;

pub type GrpcResult<T> = Result<T, GrpcError>;

/// Errors raised while preparing a client channel
#[derive(Error, Debug)]
pub enum GrpcError {
  #[error("Invalid URI: {0}")]
  InvalidUri(#[from] tonic::transport::Error),
}
