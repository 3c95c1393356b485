use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Installs color-eyre with file locations and without the env section.
///
/// Call before any fallible startup step. Repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Sets up the global subscriber for `environment`.
///
/// - Production: flattened JSON events, default filter `info,sea_orm=warn`
/// - Development: pretty output, default filter `debug`
///
/// `RUST_LOG` overrides the default filter. An [`tracing_error::ErrorLayer`]
/// is installed in both cases so eyre reports carry span traces. Calling this
/// more than once is harmless.
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new("info,sea_orm=warn,tower_http=info")
        } else {
            EnvFilter::new("debug")
        }
    });

    let result = if is_production {
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
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(()) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping"),
    }
}
