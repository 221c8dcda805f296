//! Synthetic load generation.
//!
//! Emits fake per-user status samples into the metrics registry so dashboards
//! have something to plot. Not derived from real traffic.

pub mod producer;

pub use producer::StatusProducer;
