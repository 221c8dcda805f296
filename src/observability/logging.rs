//! Structured logging.
//!
//! Installs the process-wide `tracing` subscriber: an env filter, a fmt layer
//! for stdout and, when span export is on, the OpenTelemetry layer.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::observability::tracing::Telemetry;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    format!("todo_service={},tower_http=debug", config.log_level)
}

/// Install the global subscriber. Call once, before any other subsystem logs.
pub fn init_logging(
    config: &ObservabilityConfig,
    telemetry: Option<&Telemetry>,
) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into());
    let otel_layer = telemetry.map(|t| tracing_opentelemetry::layer().with_tracer(t.tracer()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .try_init()
}
