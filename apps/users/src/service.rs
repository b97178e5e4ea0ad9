//! gRPC adapter over [`UserService`].
//!
//! Validation, use case, then status mapping. Every response and every
//! error carries the HTTP status the gateway should answer with.

use domain_users::{
    PageRequest, UserError, UserNotifier, UserRepository, UserService, next_page_token,
    parse_user_id,
};
use grpc_client::{response_with_http_code, status_with_http_code};
use http::StatusCode;
use rpc::users::v1::users_service_server::UsersService;
use rpc::users::v1::{
    AddUserResponse, ListUsersByCountryRequest, UserIdRequest, UserList, UserRequest,
};
use tonic::{Code, Request, Response, Status};
use tracing::error;

use crate::conversions::{add_user_input, list_users_input, update_user_input, user_to_proto};

pub const INVALID_REQUEST: &str = "validation error";
pub const USER_ALREADY_EXISTS: &str = "user already exists";
pub const USER_NOT_FOUND: &str = "user not found";
pub const INTERNAL_ERROR: &str = "something went wrong";

pub struct UsersServiceImpl<R: UserRepository, N: UserNotifier> {
    service: UserService<R, N>,
}

impl<R: UserRepository, N: UserNotifier> UsersServiceImpl<R, N> {
    pub fn new(service: UserService<R, N>) -> Self {
        Self { service }
    }
}

/// Maps a domain failure onto the wire.
///
/// Clients see a fixed message per kind; validation failures also carry the
/// field → message map as JSON in the status details. Internal causes are
/// logged here and never sent.
pub fn user_error_to_status(err: UserError) -> Status {
    match err {
        UserError::Validation(violations) => status_with_http_code(
            Code::InvalidArgument,
            INVALID_REQUEST,
            Some(violations.to_json_bytes()),
            StatusCode::BAD_REQUEST,
        ),
        UserError::AlreadyExists(_) => status_with_http_code(
            Code::AlreadyExists,
            USER_ALREADY_EXISTS,
            None,
            StatusCode::CONFLICT,
        ),
        UserError::NotFound(_) => {
            status_with_http_code(Code::NotFound, USER_NOT_FOUND, None, StatusCode::NOT_FOUND)
        }
        UserError::Internal(cause) => {
            error!(error = %cause, "request failed");
            status_with_http_code(
                Code::Internal,
                INTERNAL_ERROR,
                None,
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    }
}

#[tonic::async_trait]
impl<R, N> UsersService for UsersServiceImpl<R, N>
where
    R: UserRepository + 'static,
    N: UserNotifier + 'static,
{
    /// Not idempotent: if the notifier fails after the insert, the call fails
    /// but the user exists, and a retry conflicts on the email.
    async fn add_user(
        &self,
        request: Request<UserRequest>,
    ) -> Result<Response<AddUserResponse>, Status> {
        let new_user = add_user_input(request.into_inner())
            .into_new_user()
            .map_err(user_error_to_status)?;

        let id = self
            .service
            .add_user(new_user)
            .await
            .map_err(user_error_to_status)?;

        Ok(response_with_http_code(
            AddUserResponse { id: id.to_string() },
            StatusCode::CREATED,
        ))
    }

    async fn update_user(&self, request: Request<UserRequest>) -> Result<Response<()>, Status> {
        let (id, patch) = update_user_input(request.into_inner())
            .into_patch()
            .map_err(user_error_to_status)?;

        self.service
            .update_user(id, patch)
            .await
            .map_err(user_error_to_status)?;

        Ok(response_with_http_code((), StatusCode::NO_CONTENT))
    }

    async fn delete_user(&self, request: Request<UserIdRequest>) -> Result<Response<()>, Status> {
        let id = parse_user_id(&request.into_inner().id).map_err(user_error_to_status)?;

        self.service
            .delete_user(id)
            .await
            .map_err(user_error_to_status)?;

        Ok(response_with_http_code((), StatusCode::NO_CONTENT))
    }

    async fn list_users_by_country(
        &self,
        request: Request<ListUsersByCountryRequest>,
    ) -> Result<Response<UserList>, Status> {
        let query = list_users_input(request.into_inner())
            .into_query()
            .map_err(user_error_to_status)?;
        let page: PageRequest = query.page;

        let users = self
            .service
            .list_users_by_country(query)
            .await
            .map_err(user_error_to_status)?;

        let next_page_token = next_page_token(page, users.len());
        Ok(response_with_http_code(
            UserList {
                users: users.into_iter().map(user_to_proto).collect(),
                next_page_token,
            },
            StatusCode::OK,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_users::{FieldViolations, InMemoryUserRepository, NoopNotifier, PgUserRepository};
    use grpc_client::http_code_of;
    use sea_orm::{ConnAcquireErr, DbBackend, DbErr, MockDatabase, RuntimeErr};

    const DIGEST: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    fn service() -> UsersServiceImpl<InMemoryUserRepository, NoopNotifier> {
        UsersServiceImpl::new(UserService::new(
            InMemoryUserRepository::new(),
            NoopNotifier,
        ))
    }

    fn alice(email: &str) -> UserRequest {
        UserRequest {
            first_name: Some("Alice".into()),
            last_name: Some("Bob".into()),
            password_hash: Some(DIGEST.into()),
            email: Some(email.into()),
            country: Some("UK".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_error_mapping() {
        let mut violations = FieldViolations::new();
        violations.add("email", "must be a valid email address");
        let status = user_error_to_status(UserError::Validation(violations));
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), INVALID_REQUEST);
        assert_eq!(
            status.details(),
            br#"{"email":"must be a valid email address"}"#
        );
        assert_eq!(http_code_of(status.metadata()), Some(StatusCode::BAD_REQUEST));

        let status = user_error_to_status(UserError::AlreadyExists("email taken".into()));
        assert_eq!(status.code(), Code::AlreadyExists);
        assert_eq!(http_code_of(status.metadata()), Some(StatusCode::CONFLICT));

        let status = user_error_to_status(UserError::NotFound(uuid::Uuid::nil()));
        assert_eq!(status.message(), USER_NOT_FOUND);
        assert_eq!(http_code_of(status.metadata()), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_internal_cause_is_not_leaked() {
        let status = user_error_to_status(UserError::Internal("password=hunter2".into()));
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), INTERNAL_ERROR);
        assert!(status.details().is_empty());
    }

    #[tokio::test]
    async fn test_add_user_returns_created() {
        let response = service()
            .add_user(Request::new(alice("alice@bob.com")))
            .await
            .unwrap();
        assert_eq!(http_code_of(response.metadata()), Some(StatusCode::CREATED));
        assert!(uuid::Uuid::parse_str(&response.get_ref().id).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected_before_storage() {
        let svc = service();
        let err = svc
            .add_user(Request::new(alice("not-an-email")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        let details: serde_json::Value = serde_json::from_slice(err.details()).unwrap();
        assert!(details.get("email").is_some());

        let listed = svc
            .list_users_by_country(Request::new(ListUsersByCountryRequest {
                country: "UK".into(),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert!(listed.get_ref().users.is_empty());
    }

    #[tokio::test]
    async fn test_update_without_fields_succeeds() {
        let svc = service();
        let id = svc
            .add_user(Request::new(alice("alice@bob.com")))
            .await
            .unwrap()
            .into_inner()
            .id;

        let response = svc
            .update_user(Request::new(UserRequest {
                id,
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(http_code_of(response.metadata()), Some(StatusCode::NO_CONTENT));
    }

    #[tokio::test]
    async fn test_delete_requires_id() {
        let err = service()
            .delete_user(Request::new(UserIdRequest::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        let details: serde_json::Value = serde_json::from_slice(err.details()).unwrap();
        assert_eq!(details["id"], "is required");
    }

    #[tokio::test]
    async fn test_list_pages_with_tokens() {
        let svc = service();
        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            svc.add_user(Request::new(alice(email))).await.unwrap();
        }

        let first = svc
            .list_users_by_country(Request::new(ListUsersByCountryRequest {
                country: "UK".into(),
                page_size: 2,
                page_token: String::new(),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(first.users.len(), 2);
        assert_eq!(first.next_page_token, "2");

        let second = svc
            .list_users_by_country(Request::new(ListUsersByCountryRequest {
                country: "UK".into(),
                page_size: 2,
                page_token: first.next_page_token,
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(second.users.len(), 1);
        assert_eq!(second.next_page_token, "");
    }

    fn store_errors() -> Vec<DbErr> {
        vec![
            DbErr::Conn(RuntimeErr::Internal("connection reset by peer".into())),
            DbErr::ConnectionAcquire(ConnAcquireErr::Timeout),
        ]
    }

    /// Every query and every statement fails, once per entry in `store_errors`.
    fn failing_store() -> UsersServiceImpl<PgUserRepository, NoopNotifier> {
        let db = MockDatabase::new(DbBackend::Postgres)
            .append_query_errors(store_errors())
            .append_exec_errors(store_errors())
            .into_connection();
        UsersServiceImpl::new(UserService::new(PgUserRepository::new(db), NoopNotifier))
    }

    fn assert_internal(status: &Status) {
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), INTERNAL_ERROR);
        assert_eq!(
            http_code_of(status.metadata()),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[tokio::test]
    async fn test_store_failures_are_internal() {
        let svc = failing_store();

        // Query path: driver error, then pool timeout
        for _ in 0..2 {
            let err = svc
                .add_user(Request::new(alice("alice@bob.com")))
                .await
                .unwrap_err();
            assert_internal(&err);
        }

        // Exec path
        let id = uuid::Uuid::new_v4().to_string();
        for _ in 0..2 {
            let err = svc
                .delete_user(Request::new(UserIdRequest { id: id.clone() }))
                .await
                .unwrap_err();
            assert_internal(&err);
        }
    }

    #[tokio::test]
    async fn test_failed_list_is_internal_not_empty() {
        let svc = failing_store();

        let err = svc
            .list_users_by_country(Request::new(ListUsersByCountryRequest {
                country: "UK".into(),
                ..Default::default()
            }))
            .await
            .unwrap_err();
        assert_internal(&err);
    }
}
