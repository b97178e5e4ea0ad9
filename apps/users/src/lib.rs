//! Users gRPC Service
//!
//! Account management over gRPC, with a REST gateway in front of it.
//!
//! ## Architecture
//!
//! ```text
//! HTTP client                         gRPC client
//!   ↓ (JSON)                            ↓ (zstd)
//! gateway (axum) ──── channel ────► UsersServiceImpl (service.rs)
//!                                       ↓ (wire → validated domain input)
//!                                   UserService (domain layer)
//!                                       ↓
//!                                   PgUserRepository → PostgreSQL
//! ```
//!
//! ## Modules
//!
//! - `config`: Environment-driven service configuration
//! - `conversions`: Wire ↔ domain mapping
//! - `gateway`: REST routes, OpenAPI document, `/health`
//! - `server`: Server initialization and lifecycle
//! - `service`: gRPC service implementation and error mapping

pub mod config;
pub mod conversions;
pub mod gateway;
pub mod server;
pub mod service;

pub use config::{NotifierKind, ServiceConfig};
pub use server::run;
pub use service::UsersServiceImpl;
