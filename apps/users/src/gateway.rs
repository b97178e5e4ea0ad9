//! REST gateway.
//!
//! Each route forwards to the gRPC service over a client channel and answers
//! with the status the handler put in `x-http-code`, falling back to the
//! conventional mapping of the gRPC code.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use database::postgres::{DatabaseConnection, check_health};
use grpc_client::{http_code_of, http_status_for, status_with_http_code};
use rpc::users::v1 as proto;
use rpc::users::v1::users_service_client::UsersServiceClient;
use serde::{Deserialize, Serialize};
use tonic::transport::Channel;
use tonic::{Code, Status};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

#[derive(Clone)]
pub struct GatewayState {
    pub client: UsersServiceClient<Channel>,
    pub db: DatabaseConnection,
}

#[derive(OpenApi)]
#[openapi(
    paths(add_user, update_user, delete_user, list_users, health),
    components(schemas(
        AddUserBody,
        UpdateUserBody,
        AddUserReply,
        UserReply,
        UserListReply,
        HealthReply,
        ErrorBody,
        ErrorDetail,
    )),
    tags((name = "users", description = "User accounts"))
)]
pub struct ApiDoc;

const STORE_UNAVAILABLE: &str = "database unavailable";

pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/v1/users", post(add_user).get(list_users))
        .route("/v1/users/{id}", patch(update_user).delete(delete_user))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

// ============================================================================
// Bodies
// ============================================================================

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AddUserBody {
    /// Optional client-chosen UUID
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    /// Hex encoded SHA-256 digest
    pub password_hash: Option<String>,
    pub email: Option<String>,
    /// ISO 3166-1 alpha-2
    pub country: Option<String>,
}

impl From<AddUserBody> for proto::UserRequest {
    fn from(body: AddUserBody) -> Self {
        proto::UserRequest {
            id: body.id.unwrap_or_default(),
            first_name: body.first_name,
            last_name: body.last_name,
            nickname: body.nickname,
            password_hash: body.password_hash,
            email: body.email,
            country: body.country,
        }
    }
}

/// Fields to change; absent or empty fields are left as they are.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateUserBody {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub password_hash: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
}

impl UpdateUserBody {
    fn into_request(self, id: String) -> proto::UserRequest {
        proto::UserRequest {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            nickname: self.nickname,
            password_hash: self.password_hash,
            email: self.email,
            country: self.country,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// ISO 3166-1 alpha-2
    #[serde(default)]
    pub country: String,
    /// Defaults to 100
    #[serde(default)]
    pub page_size: u32,
    /// `next_page_token` of the previous page
    #[serde(default)]
    pub page_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddUserReply {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserReply {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    pub email: String,
    pub country: String,
    /// Unix seconds
    pub created_at: i64,
    /// Unix seconds
    pub updated_at: i64,
}

impl From<proto::User> for UserReply {
    fn from(user: proto::User) -> Self {
        UserReply {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            email: user.email,
            country: user.country,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListReply {
    pub users: Vec<UserReply>,
    /// Empty on the last page
    pub next_page_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthReply {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// Field → violation, on validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
}

// ============================================================================
// Errors
// ============================================================================

/// A failed call, rendered as `{"error": {...}}`.
#[derive(Debug)]
pub struct ApiError(Status);

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        ApiError(status)
    }
}

// Extractor rejections never reach the service; render them like its
// validation failures, keeping axum's status (400, 415 or 422).
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(status_with_http_code(
            Code::InvalidArgument,
            rejection.body_text(),
            None,
            rejection.status(),
        ))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(status_with_http_code(
            Code::InvalidArgument,
            rejection.body_text(),
            None,
            rejection.status(),
        ))
    }
}

fn error_kind(code: Code) -> &'static str {
    match code {
        Code::InvalidArgument => "validation_error",
        Code::AlreadyExists => "already_exists",
        Code::NotFound => "not_found",
        Code::Unavailable | Code::DeadlineExceeded => "unavailable",
        _ => "internal",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0;
        let http = http_code_of(status.metadata()).unwrap_or_else(|| http_status_for(status.code()));

        let details = if status.code() == Code::InvalidArgument && !status.details().is_empty() {
            serde_json::from_slice::<BTreeMap<String, String>>(status.details()).ok()
        } else {
            None
        };
        if http.is_server_error() {
            warn!(code = ?status.code(), message = status.message(), "upstream call failed");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                kind: error_kind(status.code()).to_string(),
                message: status.message().to_string(),
                details,
            },
        };
        (http, Json(body)).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "users",
    request_body = AddUserBody,
    responses(
        (status = 201, description = "User created", body = AddUserReply),
        (status = 400, description = "Invalid fields", body = ErrorBody),
        (status = 409, description = "Email or id already taken", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn add_user(
    State(state): State<GatewayState>,
    body: Result<Json<AddUserBody>, JsonRejection>,
) -> Result<(StatusCode, Json<AddUserReply>), ApiError> {
    let Json(body) = body?;
    let mut client = state.client;
    let response = client.add_user(proto::UserRequest::from(body)).await?;

    let http = http_code_of(response.metadata()).unwrap_or(StatusCode::CREATED);
    Ok((
        http,
        Json(AddUserReply {
            id: response.into_inner().id,
        }),
    ))
}

#[utoipa::path(
    patch,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User UUID")),
    request_body = UpdateUserBody,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Invalid fields", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 409, description = "Email already taken", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateUserBody>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(body) = body?;
    let mut client = state.client;
    let response = client.update_user(body.into_request(id)).await?;
    Ok(http_code_of(response.metadata()).unwrap_or(StatusCode::NO_CONTENT))
}

#[utoipa::path(
    delete,
    path = "/v1/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut client = state.client;
    let response = client.delete_user(proto::UserIdRequest { id }).await?;
    Ok(http_code_of(response.metadata()).unwrap_or(StatusCode::NO_CONTENT))
}

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "One page of users", body = UserListReply),
        (status = 400, description = "Invalid country or page token", body = ErrorBody)
    )
)]
pub async fn list_users(
    State(state): State<GatewayState>,
    params: Result<Query<ListUsersParams>, QueryRejection>,
) -> Result<(StatusCode, Json<UserListReply>), ApiError> {
    let Query(params) = params?;
    let mut client = state.client;
    let response = client
        .list_users_by_country(proto::ListUsersByCountryRequest {
            country: params.country,
            page_size: params.page_size,
            page_token: params.page_token,
        })
        .await?;

    let http = http_code_of(response.metadata()).unwrap_or(StatusCode::OK);
    let list = response.into_inner();
    Ok((
        http,
        Json(UserListReply {
            users: list.users.into_iter().map(UserReply::from).collect(),
            next_page_token: list.next_page_token,
        }),
    ))
}

/// Store reachability, for load balancers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "users",
    responses(
        (status = 200, description = "Store reachable", body = HealthReply),
        (status = 503, description = "Store unreachable", body = HealthReply)
    )
)]
pub async fn health(State(state): State<GatewayState>) -> (StatusCode, Json<HealthReply>) {
    match check_health(&state.db).await {
        Ok(report) => (
            StatusCode::OK,
            Json(HealthReply {
                status: "ok".to_string(),
                database_version: Some(report.version),
                error: None,
            }),
        ),
        Err(e) => {
            warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthReply {
                    status: "unavailable".to_string(),
                    database_version: None,
                    error: Some(STORE_UNAVAILABLE.to_string()),
                }),
            )
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grpc_client::status_with_http_code;

    #[test]
    fn test_error_body_carries_violations() {
        let status = status_with_http_code(
            Code::InvalidArgument,
            "validation error",
            Some(br#"{"country":"must be exactly 2 characters"}"#.to_vec()),
            StatusCode::BAD_REQUEST,
        );
        let response = ApiError::from(status).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_without_http_code_uses_fallback() {
        let response = ApiError::from(Status::unavailable("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/v1/users"));
        assert!(doc.paths.paths.contains_key("/v1/users/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
