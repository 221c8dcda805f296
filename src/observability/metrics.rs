//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_request_get_user_status_count` (counter): synthetic samples by user, status
//! - `http_request_count` (counter): successful requests by method, endpoint
//! - `http_todo_count` (counter): todo mutations by action
//!
//! Each counter family is registered against a recorder owned by
//! [`ServiceMetrics`]; nothing is installed globally, so several registries can
//! live side by side (one per test server, for instance).

use axum::http::Method;
use metrics::{counter, describe_counter, with_local_recorder};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};

pub const USER_STATUS_COUNT: &str = "http_request_get_user_status_count";
pub const REQUEST_COUNT: &str = "http_request_count";
pub const TODO_ACTION_COUNT: &str = "http_todo_count";

/// Coarse status bucket recorded by the synthetic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    ClientError,
}

impl StatusClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::ClientError => "4xx",
        }
    }
}

/// Mutation recorded in `http_todo_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoAction {
    Created,
    Deleted,
}

impl TodoAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoAction::Created => "created",
            TodoAction::Deleted => "deleted",
        }
    }
}

/// Process-wide counter registry. Build once at startup and share by `Arc`.
pub struct ServiceMetrics {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let metrics = Self { recorder, handle };
        metrics.describe();
        metrics
    }

    fn describe(&self) {
        with_local_recorder(&self.recorder, || {
            describe_counter!(USER_STATUS_COUNT, "Count of status returned by user");
            describe_counter!(REQUEST_COUNT, "Total number of requests");
            describe_counter!(TODO_ACTION_COUNT, "Count of todos");
        });
    }

    pub fn record_user_status(&self, user: &str, status: StatusClass) {
        with_local_recorder(&self.recorder, || {
            counter!(
                USER_STATUS_COUNT,
                "user" => user.to_owned(),
                "status" => status.as_str()
            )
            .increment(1);
        });
    }

    pub fn record_request(&self, method: &Method, endpoint: &'static str) {
        with_local_recorder(&self.recorder, || {
            counter!(
                REQUEST_COUNT,
                "method" => method.as_str().to_owned(),
                "endpoint" => endpoint
            )
            .increment(1);
        });
    }

    pub fn record_todo_action(&self, action: TodoAction) {
        with_local_recorder(&self.recorder, || {
            counter!(TODO_ACTION_COUNT, "action" => action.as_str()).increment(1);
        });
    }

    /// Prometheus text exposition of every registered counter.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line<'a>(rendered: &'a str, name: &str, labels: &[&str]) -> Option<&'a str> {
        rendered.lines().find(|line| {
            line.starts_with(&format!("{name}{{")) && labels.iter().all(|l| line.contains(l))
        })
    }

    #[test]
    fn test_counters_render_with_labels() {
        let metrics = ServiceMetrics::new();
        metrics.record_request(&Method::POST, "/todos");
        metrics.record_request(&Method::POST, "/todos");
        metrics.record_todo_action(TodoAction::Created);
        metrics.record_user_status("alice", StatusClass::ClientError);

        let rendered = metrics.render();

        let line = sample_line(&rendered, REQUEST_COUNT, &["method=\"POST\"", "endpoint=\"/todos\""])
            .expect("request counter rendered");
        assert!(line.ends_with(" 2"), "{line}");

        let line = sample_line(&rendered, TODO_ACTION_COUNT, &["action=\"created\""])
            .expect("todo counter rendered");
        assert!(line.ends_with(" 1"), "{line}");

        let line = sample_line(&rendered, USER_STATUS_COUNT, &["user=\"alice\"", "status=\"4xx\""])
            .expect("user status counter rendered");
        assert!(line.ends_with(" 1"), "{line}");
    }

    #[test]
    fn test_help_text_is_exposed() {
        let metrics = ServiceMetrics::new();
        metrics.record_todo_action(TodoAction::Deleted);
        assert!(metrics.render().contains("# HELP http_todo_count Count of todos"));
    }

    #[test]
    fn test_registries_are_independent() {
        let a = ServiceMetrics::new();
        let b = ServiceMetrics::new();
        a.record_todo_action(TodoAction::Created);

        assert!(a.render().contains(TODO_ACTION_COUNT));
        assert!(!b.render().contains("action=\"created\""));
    }
}
