//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! main.rs:
//!     Load config → Validate (config::load_from_env)
//!
//! Startup (startup.rs):
//!     Validated ServiceConfig → Tracing + logging → Open store → Bind listener
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Broadcast → HTTP server drains, synthetic producer exits → spans flushed
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is retried
//! - Ordered startup: observability first, store second, listener last
//! - Every long-running task subscribes to the same broadcast

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Service, StartupError};
