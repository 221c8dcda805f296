//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! The defaults reproduce the service's compiled-in behaviour.

use serde::{Deserialize, Serialize};

/// Root configuration for the todo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// SQLite store location.
    pub store: StoreConfig,

    /// Logging and trace export settings.
    pub observability: ObservabilityConfig,

    /// Synthetic user-status counter generator.
    pub generator: GeneratorConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Persistent store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the SQLite database file, created on first run.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "./test.db".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// `service.name` resource attribute and tracer name.
    pub service_name: String,

    /// Export spans to an OTLP collector.
    pub tracing_enabled: bool,

    /// OTLP/HTTP traces endpoint.
    pub otlp_endpoint: String,

    /// Refuse to start when the collector is not reachable.
    pub fail_fast: bool,

    /// Collector reachability probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            service_name: "todo-service".to_string(),
            tracing_enabled: true,
            otlp_endpoint: "http://localhost:4318/v1/traces".to_string(),
            fail_fast: true,
            probe_timeout_ms: 2000,
        }
    }
}

/// Synthetic load generator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Run the generator alongside the HTTP server.
    pub enabled: bool,

    /// Seconds between two samples.
    pub interval_secs: u64,

    /// Users picked uniformly at random.
    pub users: Vec<String>,

    /// Probability of recording a "4xx" instead of a "2xx".
    pub error_ratio: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 2,
            users: vec!["bob".to_string(), "alice".to_string(), "jack".to_string()],
            error_ratio: 0.2,
        }
    }
}
