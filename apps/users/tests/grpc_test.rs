//! gRPC transport tests over a real socket.

mod common;

use std::time::Duration;

use async_trait::async_trait;
use domain_users::{NewUser, User, UserId, UserPatch, UserRepository, UserResult};
use grpc_client::{http_code_of, http_status_for};
use http::StatusCode;
use rpc::users::v1::{ListUsersByCountryRequest, UserIdRequest, UserRequest};
use tonic::Code;

use common::{DIGEST, spawn_grpc, spawn_grpc_with};

/// Store that never answers within the request timeout.
struct StalledRepository;

#[async_trait]
impl UserRepository for StalledRepository {
    async fn create(&self, _user: NewUser) -> UserResult<User> {
        std::future::pending().await
    }

    async fn update(&self, _id: UserId, _patch: UserPatch) -> UserResult<()> {
        std::future::pending().await
    }

    async fn delete(&self, _id: UserId) -> UserResult<()> {
        std::future::pending().await
    }

    async fn list_by_country(
        &self,
        _country: String,
        _limit: u64,
        _offset: u64,
    ) -> UserResult<Vec<User>> {
        std::future::pending().await
    }
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

#[tokio::test]
async fn test_success_metadata_survives_transport() {
    let mut client = spawn_grpc().await;

    let added = client.add_user(alice("alice@bob.com")).await.unwrap();
    assert_eq!(http_code_of(added.metadata()), Some(StatusCode::CREATED));
    let id = added.into_inner().id;

    let listed = client
        .list_users_by_country(ListUsersByCountryRequest {
            country: "UK".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(http_code_of(listed.metadata()), Some(StatusCode::OK));
    assert_eq!(listed.into_inner().users[0].id, id);

    let deleted = client.delete_user(UserIdRequest { id }).await.unwrap();
    assert_eq!(http_code_of(deleted.metadata()), Some(StatusCode::NO_CONTENT));
}

#[tokio::test]
async fn test_client_supplied_id_conflicts_on_reuse() {
    let mut client = spawn_grpc().await;
    let id = "6a1f0a5e-35a4-4d38-9f44-0d3c1c0e2f11".to_string();

    let mut first = alice("alice@bob.com");
    first.id = id.clone();
    let added = client.add_user(first).await.unwrap().into_inner();
    assert_eq!(added.id, id);

    let mut second = alice("carol@bob.com");
    second.id = id;
    let err = client.add_user(second).await.unwrap_err();
    assert_eq!(err.code(), Code::AlreadyExists);
    assert_eq!(http_code_of(err.metadata()), Some(StatusCode::CONFLICT));
}

#[tokio::test]
async fn test_validation_details_survive_transport() {
    let mut client = spawn_grpc().await;

    let err = client
        .add_user(UserRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    assert_eq!(err.message(), "validation error");
    assert_eq!(http_code_of(err.metadata()), Some(StatusCode::BAD_REQUEST));

    let details: serde_json::Value = serde_json::from_slice(err.details()).unwrap();
    for field in ["first_name", "last_name", "password_hash", "email", "country"] {
        assert_eq!(details[field], "is required", "field {field}");
    }
}

#[tokio::test]
async fn test_update_requires_id() {
    let mut client = spawn_grpc().await;

    let err = client
        .update_user(UserRequest {
            first_name: Some("Eve".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
    let details: serde_json::Value = serde_json::from_slice(err.details()).unwrap();
    assert_eq!(details["id"], "is required");
}

#[tokio::test]
async fn test_timed_out_store_call_is_neither_not_found_nor_conflict() {
    let mut client = spawn_grpc_with(StalledRepository, Duration::from_millis(50)).await;

    let err = client
        .delete_user(UserIdRequest {
            id: "6a1f0a5e-35a4-4d38-9f44-0d3c1c0e2f11".into(),
        })
        .await
        .unwrap_err();
    assert!(
        matches!(err.code(), Code::Cancelled | Code::DeadlineExceeded),
        "unexpected code {:?}",
        err.code()
    );
    // No handler ran to completion, so the gateway falls back on the code.
    assert_eq!(http_code_of(err.metadata()), None);
    let http = http_status_for(err.code());
    assert_ne!(http, StatusCode::NOT_FOUND);
    assert_ne!(http, StatusCode::CONFLICT);

    let err = client
        .add_user(alice("alice@bob.com"))
        .await
        .unwrap_err();
    assert!(matches!(err.code(), Code::Cancelled | Code::DeadlineExceeded));
}
