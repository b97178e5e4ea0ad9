//! Server initialization and lifecycle
//!
//! - Database connection with retry
//! - gRPC server (users service, grpc.health.v1.Health, zstd)
//! - REST gateway dialing the gRPC server through a lazy channel
//! - Coordinated shutdown on Ctrl+C / SIGTERM

use std::future::Future;
use std::net::SocketAddr;

use core_config::{GrpcServerConfig, ServerConfig};
use database::RetryConfig;
use database::postgres::{DatabaseConnection, connect_from_config_with_retry};
use domain_users::{
    NoopNotifier, PgUserRepository, TracingNotifier, UserNotifier, UserRepository, UserService,
};
use eyre::{Result, WrapErr};
use grpc_client::{ChannelConfig, create_channel_lazy};
use rpc::users::v1::users_service_client::UsersServiceClient;
use rpc::users::v1::users_service_server::{SERVICE_NAME, UsersServiceServer};
use tokio::sync::watch;
use tonic::codec::CompressionEncoding;
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tonic_health::server::health_reporter;
use tracing::{error, info};

use crate::config::{NotifierKind, ServiceConfig};
use crate::gateway::{self, GatewayState};
use crate::service::UsersServiceImpl;

/// Wraps the adapter in the generated server with zstd in both directions.
pub fn users_server<R, N>(service: UsersServiceImpl<R, N>) -> UsersServiceServer<UsersServiceImpl<R, N>>
where
    R: UserRepository + 'static,
    N: UserNotifier + 'static,
{
    UsersServiceServer::new(service)
        .accept_compressed(CompressionEncoding::Zstd)
        .send_compressed(CompressionEncoding::Zstd)
}

/// Run both listeners until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if:
/// - The database stays unreachable past the retry budget
/// - A listener address is invalid or cannot be bound
/// - Either server fails at runtime
pub async fn run(config: ServiceConfig) -> Result<()> {
    info!("Connecting to database...");
    let db = connect_from_config_with_retry(config.database.clone(), RetryConfig::default())
        .await
        .wrap_err("Failed to connect to database")?;
    info!("Connected to database successfully");

    info!(notifier = %config.notifier, "Wiring user notifier");
    let result = match config.notifier {
        NotifierKind::Noop => serve(&config, db.clone(), NoopNotifier).await,
        NotifierKind::Log => serve(&config, db.clone(), TracingNotifier).await,
    };

    info!("Shutting down: closing database connections");
    if let Err(e) = db.close().await {
        error!("Error closing PostgreSQL: {}", e);
    }

    result
}

async fn serve<N>(config: &ServiceConfig, db: DatabaseConnection, notifier: N) -> Result<()>
where
    N: UserNotifier + 'static,
{
    let service = UserService::new(PgUserRepository::new(db.clone()), notifier);

    let channel = create_channel_lazy(
        config.grpc.client_endpoint(),
        ChannelConfig::default().with_request_timeout(config.grpc.request_timeout),
    )
    .wrap_err("Failed to create gateway channel")?;
    let gateway_state = GatewayState {
        client: UsersServiceClient::new(channel),
        db,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    tokio::try_join!(
        serve_grpc(
            UsersServiceImpl::new(service),
            &config.grpc,
            wait_for(shutdown_rx.clone())
        ),
        serve_gateway(
            gateway::router(gateway_state),
            &config.gateway,
            wait_for(shutdown_rx)
        ),
    )?;

    Ok(())
}

/// gRPC listener with health reporting and a per-request timeout.
pub async fn serve_grpc<R, N>(
    service: UsersServiceImpl<R, N>,
    config: &GrpcServerConfig,
    shutdown: impl Future<Output = ()>,
) -> Result<()>
where
    R: UserRepository + 'static,
    N: UserNotifier + 'static,
{
    let addr: SocketAddr = config
        .address()
        .parse()
        .wrap_err_with(|| format!("Failed to parse gRPC address: {}", config.address()))?;

    let (health_reporter, health_service) = health_reporter();
    health_reporter
        .set_service_status(SERVICE_NAME, ServingStatus::Serving)
        .await;
    // Empty name is what generic probes ask for
    health_reporter
        .set_service_status("", ServingStatus::Serving)
        .await;

    info!(%addr, timeout = ?config.request_timeout, "UsersService listening");
    Server::builder()
        .timeout(config.request_timeout)
        .add_service(health_service)
        .add_service(users_server(service))
        .serve_with_shutdown(addr, shutdown)
        .await
        .wrap_err("gRPC server failed")
}

pub async fn serve_gateway(
    router: axum::Router,
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(config.address())
        .await
        .wrap_err_with(|| format!("Failed to bind gateway on {}", config.address()))?;

    info!(addr = %config.address(), "REST gateway listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .wrap_err("REST gateway failed")
}

async fn wait_for(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal, shutting down gracefully"),
        _ = terminate => info!("Received SIGTERM signal, shutting down gracefully"),
    }
}
