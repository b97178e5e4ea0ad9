use crate::Environment;
use tracing::debug;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Installs color-eyre with file:line locations and without the env section.
///
/// Safe to call more than once.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Default directives when `RUST_LOG` is unset.
fn default_filter(environment: Environment) -> &'static str {
    if environment.is_production() {
        "info,sqlx=warn,sea_orm=warn,h2=warn"
    } else {
        "debug,h2=info,tower=info,hyper_util=info,sqlx=info"
    }
}

/// Initializes the global subscriber with an [`tracing_error::ErrorLayer`] so
/// eyre reports carry span traces.
///
/// - Production (`APP_ENV=production`): flattened JSON lines without targets.
/// - Development: pretty, human readable output.
///
/// `RUST_LOG` overrides the default directives. A second call is a no-op.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(*environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    if result.is_err() {
        debug!("tracing already initialized");
    } else {
        debug!(?environment, "tracing initialized");
    }
}
