use core_config::FromEnv;
use core_config::tracing::{init_tracing, install_color_eyre};
use eyre::WrapErr;
use users_service::ServiceConfig;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible step so startup errors are rendered too
    install_color_eyre();

    let config = ServiceConfig::from_env().wrap_err("Failed to load configuration")?;
    init_tracing(&config.environment);

    users_service::run(config).await
}
