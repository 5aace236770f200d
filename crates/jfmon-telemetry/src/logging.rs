//! Structured logging initialization.

use crate::error::{TelemetryError, TelemetryResult};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Workspace crates logged at debug regardless of the default level.
const DEBUG_TARGETS: &[&str] = &[
    "jfmon_core",
    "jfmon_client",
    "jfmon_sync",
    "jfmon_dashboard",
    "jfmon_app",
];

fn default_directives(default_level: &str) -> String {
    DEBUG_TARGETS
        .iter()
        .fold(default_level.to_string(), |acc, target| format!("{acc},{target}=debug"))
}

/// Initialize structured logging.
///
/// `RUST_LOG` takes precedence over `default_level`. JSON output is used when
/// `RUST_ENV=production`, pretty output otherwise.
pub fn init_logging(default_level: &str) -> TelemetryResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(default_level)))
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    let is_production = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let result = if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_names(true),
            )
            .try_init()
    };

    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}
