//! Distributed tracing support.
//!
//! # Responsibilities
//! - Build the OTLP/HTTP span exporter and a batching tracer provider
//! - Probe the collector at startup and refuse to start when it is unreachable
//! - Hand out the SDK tracer for the `tracing-opentelemetry` layer
//!
//! Handlers never talk to OpenTelemetry directly: they open `tracing` spans and
//! the subscriber layer turns them into exported OTel spans.

use std::time::Duration;

use opentelemetry::trace::{TraceError, TracerProvider as _};
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::{Tracer, TracerProvider};
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tokio::net::TcpStream;
use url::Url;

use crate::config::ObservabilityConfig;

/// Fatal errors while setting up span export.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("invalid OTLP endpoint '{endpoint}': {reason}")]
    Endpoint { endpoint: String, reason: String },

    #[error("collector at {address} unreachable: {reason}")]
    Unreachable { address: String, reason: String },

    #[error("failed to build OTLP span exporter: {0}")]
    Exporter(#[from] TraceError),
}

/// Owns the tracer provider so pending spans can be flushed on shutdown.
pub struct Telemetry {
    provider: TracerProvider,
    service_name: String,
}

impl Telemetry {
    /// Tracer for the `tracing-opentelemetry` layer.
    pub fn tracer(&self) -> Tracer {
        self.provider.tracer(self.service_name.clone())
    }

    /// Flush batched spans and stop the exporter.
    pub fn shutdown(self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "Tracer provider shutdown failed");
        }
    }
}

/// Initialize span export, or return `None` when tracing is disabled.
pub async fn init_tracing(config: &ObservabilityConfig) -> Result<Option<Telemetry>, TracingError> {
    if !config.tracing_enabled {
        return Ok(None);
    }

    if config.fail_fast {
        probe_collector(
            &config.otlp_endpoint,
            Duration::from_millis(config.probe_timeout_ms),
        )
        .await?;
    }

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            config.service_name.clone(),
        )]))
        .build();

    Ok(Some(Telemetry {
        provider,
        service_name: config.service_name.clone(),
    }))
}

/// Host and port a collector URL resolves to.
fn collector_address(endpoint: &str) -> Result<(String, u16), TracingError> {
    let invalid = |reason: &str| TracingError::Endpoint {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(endpoint).map_err(|e| invalid(&e.to_string()))?;
    let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
    let port = url
        .port_or_known_default()
        .ok_or_else(|| invalid("missing port"))?;
    Ok((host.trim_matches(&['[', ']'][..]).to_string(), port))
}

/// Open (and immediately drop) a TCP connection to the collector.
pub async fn probe_collector(endpoint: &str, timeout: Duration) -> Result<(), TracingError> {
    let (host, port) = collector_address(endpoint)?;
    let address = format!("{host}:{port}");

    match tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port))).await {
        Ok(Ok(_)) => {
            tracing::debug!(address = %address, "OTLP collector reachable");
            Ok(())
        }
        Ok(Err(e)) => Err(TracingError::Unreachable {
            address,
            reason: e.to_string(),
        }),
        Err(_) => Err(TracingError::Unreachable {
            address,
            reason: format!("no connection within {timeout:?}"),
        }),
    }
}
