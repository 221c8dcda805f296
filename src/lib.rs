//! Todo CRUD service library.
//!
//! HTTP handlers over a SQLite table, instrumented with Prometheus counters and
//! OpenTelemetry spans, plus a synthetic user-status counter producer.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;
pub mod synthetic;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{Service, Shutdown};
