//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, access log, panic recovery)
//! - Spawn the synthetic status producer next to the server
//! - Serve until the shutdown broadcast fires

use axum::{
    routing::{delete, get},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::http::handlers::{
    create_todo, delete_todo, get_todos, render_metrics, METRICS_ROUTE, TODOS_ROUTE, TODO_ROUTE,
};
use crate::lifecycle::Shutdown;
use crate::observability::ServiceMetrics;
use crate::store::TodoStore;
use crate::synthetic::StatusProducer;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: TodoStore,
    pub metrics: Arc<ServiceMetrics>,
}

/// HTTP server for the todo service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    metrics: Arc<ServiceMetrics>,
}

impl HttpServer {
    /// Create a new HTTP server over an opened store and metrics registry.
    pub fn new(config: ServiceConfig, store: TodoStore, metrics: Arc<ServiceMetrics>) -> Self {
        let state = AppState {
            store,
            metrics: metrics.clone(),
        };

        Self {
            router: build_router(state),
            config,
            metrics,
        }
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Both the server and the producer subscribe to `shutdown` when this is
    /// called, so a trigger that fires before the returned future is first
    /// polled still reaches them.
    pub fn run(
        self,
        listener: TcpListener,
        shutdown: &Shutdown,
    ) -> impl Future<Output = Result<(), std::io::Error>> + Send + 'static {
        let mut server_shutdown = shutdown.subscribe();
        let producer_shutdown = shutdown.subscribe();

        async move {
            let addr = listener.local_addr()?;
            tracing::info!(address = %addr, "HTTP server starting");

            let producer = StatusProducer::new(self.metrics.clone(), self.config.generator.clone());
            let producer_task = tokio::spawn(producer.run(producer_shutdown));

            axum::serve(listener, self.router)
                .with_graceful_shutdown(async move {
                    let _ = server_shutdown.recv().await;
                    tracing::info!("Shutdown signal received");
                })
                .await?;

            if let Err(e) = producer_task.await {
                tracing::warn!(error = %e, "Synthetic status producer task failed");
            }

            tracing::info!("HTTP server stopped");
            Ok(())
        }
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(TODOS_ROUTE, get(get_todos).post(create_todo))
        .route(TODO_ROUTE, delete(delete_todo))
        .route(METRICS_ROUTE, get(render_metrics))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::new()),
        )
}
