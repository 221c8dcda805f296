//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! TODO_SERVICE_CONFIG (optional TOML file)
//!     → loader.rs (parse & deserialize, defaults when unset)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → handed to startup, then cloned into subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so the service runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError, CONFIG_ENV_VAR};
pub use schema::{GeneratorConfig, ListenerConfig, ObservabilityConfig, ServiceConfig, StoreConfig};
pub use validation::{validate_config, ValidationError};
