//! # gRPC helpers
//!
//! Shared between the users gRPC server and its REST gateway:
//!
//! - **Channels**: lazily connected, HTTP/2 tuned channels for the gateway.
//! - **HTTP codes**: the `x-http-code` metadata convention that lets a gRPC
//!   handler choose the status the gateway answers with.
//! - **Conversions**: Unix-second timestamps used on the wire.
//!
//! ```ignore
//! use grpc_client::{ChannelConfig, create_channel_lazy};
//! use rpc::users::v1::users_service_client::UsersServiceClient;
//!
//! let channel = create_channel_lazy("http://127.0.0.1:50051", ChannelConfig::default())?;
//! let client = UsersServiceClient::new(channel);
//! ```

pub mod channel;
pub mod conversions;
pub mod error;
pub mod http_code;

pub use channel::{ChannelConfig, create_channel_lazy};
pub use error::{GrpcError, GrpcResult};
pub use http_code::{
  HTTP_CODE_HEADER, http_code_of, http_status_for, response_with_http_code, set_http_code,
  status_with_http_code,
};
