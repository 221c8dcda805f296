//! Startup orchestration.
//!
//! Initializes subsystems in dependency order and binds the listener last, so
//! the service only takes traffic once everything behind it is ready.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ConfigError, ServiceConfig};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::logging::init_logging;
use crate::observability::tracing::{init_tracing, Telemetry, TracingError};
use crate::observability::ServiceMetrics;
use crate::store::{StoreError, TodoStore};

/// Anything that stops the service from starting. All of these are fatal.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("tracing: {0}")]
    Tracing(#[from] TracingError),

    #[error("logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server: {0}")]
    Serve(#[from] std::io::Error),
}

/// A fully initialized service, ready to serve.
pub struct Service {
    server: HttpServer,
    listener: TcpListener,
    telemetry: Option<Telemetry>,
}

impl Service {
    /// Span export and the global subscriber, then the store, then the listener.
    pub async fn bootstrap(config: ServiceConfig) -> Result<Self, StartupError> {
        let telemetry = init_tracing(&config.observability).await?;
        init_logging(&config.observability, telemetry.as_ref())?;

        tracing::info!(
            bind_address = %config.listener.bind_address,
            store_path = %config.store.path,
            tracing_enabled = config.observability.tracing_enabled,
            otlp_endpoint = %config.observability.otlp_endpoint,
            generator_enabled = config.generator.enabled,
            "Configuration loaded"
        );

        Self::assemble(config, telemetry).await
    }

    /// Open the store and bind the listener without touching global state.
    pub async fn assemble(
        config: ServiceConfig,
        telemetry: Option<Telemetry>,
    ) -> Result<Self, StartupError> {
        let store = TodoStore::open(&config.store.path)?;
        let metrics = Arc::new(ServiceMetrics::new());

        let listener = TcpListener::bind(&config.listener.bind_address)
            .await
            .map_err(|source| StartupError::Bind {
                address: config.listener.bind_address.clone(),
                source,
            })?;

        let server = HttpServer::new(config, store, metrics);
        Ok(Self {
            server,
            listener,
            telemetry,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `signal` resolves, then drain and flush spans.
    pub async fn run_until<F>(self, signal: F) -> Result<(), StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = Shutdown::new();
        let server_task = tokio::spawn(self.server.run(self.listener, &shutdown));

        let trigger = shutdown.clone();
        tokio::spawn(async move {
            signal.await;
            trigger.trigger();
        });

        let result = match server_task.await {
            Ok(result) => result.map_err(StartupError::from),
            Err(e) => Err(StartupError::Serve(std::io::Error::other(e))),
        };

        if let Some(telemetry) = self.telemetry {
            telemetry.shutdown();
        }
        result
    }
}
