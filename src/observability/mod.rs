//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the synthetic generator produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (labelled counters)
//!     → tracing.rs (one span per handler, bridged to OpenTelemetry)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → GET /metrics (Prometheus scrape)
//!     → OTLP/HTTP collector (batched span export)
//! ```
//!
//! # Design Decisions
//! - The metrics registry is an explicit object passed through app state,
//!   never a global recorder
//! - Metrics are cheap (atomic increments)
//! - Span export can be switched off by config; spans are still created

pub mod logging;
pub mod metrics;
pub mod tracing;

pub use self::metrics::{ServiceMetrics, StatusClass, TodoAction};
