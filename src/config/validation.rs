//! Configuration validation.
//!
//! Returns all validation errors, not just the first. Runs before the config
//! is accepted into the system.

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ServiceConfig;

/// A single semantic problem found in a [`ServiceConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("store.path must not be empty")]
    EmptyStorePath,

    #[error("observability.otlp_endpoint '{0}' is not an http(s) URL with a host")]
    OtlpEndpoint(String),

    #[error("generator.interval_secs must be greater than zero")]
    ZeroInterval,

    #[error("generator.users must not be empty")]
    NoUsers,

    #[error("generator.error_ratio {0} is outside [0, 1]")]
    ErrorRatio(f64),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.store.path.trim().is_empty() {
        errors.push(ValidationError::EmptyStorePath);
    }

    let obs = &config.observability;
    if obs.tracing_enabled && !is_http_url(&obs.otlp_endpoint) {
        errors.push(ValidationError::OtlpEndpoint(obs.otlp_endpoint.clone()));
    }

    let generator = &config.generator;
    if generator.enabled {
        if generator.interval_secs == 0 {
            errors.push(ValidationError::ZeroInterval);
        }
        if generator.users.is_empty() {
            errors.push(ValidationError::NoUsers);
        }
    }
    if !(0.0..=1.0).contains(&generator.error_ratio) {
        errors.push(ValidationError::ErrorRatio(generator.error_ratio));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
