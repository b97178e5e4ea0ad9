#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use database::postgres::DatabaseConnection;
use domain_users::{InMemoryUserRepository, NoopNotifier, UserRepository, UserService};
use grpc_client::{ChannelConfig, create_channel_lazy};
use rpc::users::v1::users_service_client::UsersServiceClient;
use sea_orm::{DbBackend, DbErr, MockDatabase, Value};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use users_service::UsersServiceImpl;
use users_service::server::users_server;

pub const DIGEST: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

/// Serves the users service over an in-memory store on an ephemeral port.
pub async fn spawn_grpc() -> UsersServiceClient<Channel> {
    spawn_grpc_with(InMemoryUserRepository::new(), Duration::from_secs(30)).await
}

/// Serves the users service over `repository` with a per-request timeout.
pub async fn spawn_grpc_with<R>(repository: R, timeout: Duration) -> UsersServiceClient<Channel>
where
    R: UserRepository + 'static,
{
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let service = UsersServiceImpl::new(UserService::new(repository, NoopNotifier));
    tokio::spawn(async move {
        Server::builder()
            .timeout(timeout)
            .add_service(users_server(service))
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    let channel = create_channel_lazy(format!("http://{addr}"), ChannelConfig::default()).unwrap();
    UsersServiceClient::new(channel)
}

/// Store that answers one health probe.
pub fn healthy_db() -> DatabaseConnection {
    let row = BTreeMap::from([(
        "version".to_string(),
        Value::from("PostgreSQL 18.0"),
    )]);
    MockDatabase::new(DbBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection()
}

/// Store whose version query fails.
pub fn broken_db() -> DatabaseConnection {
    MockDatabase::new(DbBackend::Postgres)
        .append_query_errors([DbErr::Custom("connection refused".to_string())])
        .into_connection()
}
