//! Generated protobuf and gRPC code for the users API.
//!
//! Regenerate with `buf generate` from the repository root; the sources live
//! in `proto/users/v1/users.proto`.

#[allow(clippy::all)]
mod gen;

pub use gen::users;
