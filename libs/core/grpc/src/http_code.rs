//! `x-http-code` metadata.
//!
//! A handler attaches the HTTP status it wants the REST gateway to use, on
//! success (response metadata) as well as on failure (status metadata). The
//! gateway falls back to [`http_status_for`] when the entry is missing.

use http::StatusCode;
use tonic::codegen::Bytes;
use tonic::metadata::{MetadataMap, MetadataValue};
use tonic::{Code, Response, Status};

pub const HTTP_CODE_HEADER: &str = "x-http-code";

pub fn set_http_code(metadata: &mut MetadataMap, code: StatusCode) {
  metadata.insert(HTTP_CODE_HEADER, MetadataValue::from(code.as_u16()));
}

/// Wraps `message` in a response carrying `code`.
pub fn response_with_http_code<T>(message: T, code: StatusCode) -> Response<T> {
  let mut response = Response::new(message);
  set_http_code(response.metadata_mut(), code);
  response
}

/// Builds a status carrying `http` in its metadata and `details` as the
/// binary status details.
pub fn status_with_http_code(
  code: Code,
  message: impl Into<String>,
  details: Option<Vec<u8>>,
  http: StatusCode,
) -> Status {
  let mut metadata = MetadataMap::new();
  set_http_code(&mut metadata, http);
  let details = details.map(Bytes::from).unwrap_or_default();
  Status::with_details_and_metadata(code, message, details, metadata)
}

/// The `x-http-code` entry, when present and a valid status code.
pub fn http_code_of(metadata: &MetadataMap) -> Option<StatusCode> {
  let raw = metadata.get(HTTP_CODE_HEADER)?.to_str().ok()?;
  let code: u16 = raw.trim().parse().ok()?;
  StatusCode::from_u16(code).ok()
}

/// HTTP status conventionally used for a gRPC code.
pub fn http_status_for(code: Code) -> StatusCode {
  match code {
    Code::Ok => StatusCode::OK,
    Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
    Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange => {
      StatusCode::BAD_REQUEST
    }
    Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
    Code::NotFound => StatusCode::NOT_FOUND,
    Code::AlreadyExists | Code::Aborted => StatusCode::CONFLICT,
    Code::PermissionDenied => StatusCode::FORBIDDEN,
    Code::Unauthenticated => StatusCode::UNAUTHORIZED,
    Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
    Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
    Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
    Code::Unknown | Code::Internal | Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
  }
}
