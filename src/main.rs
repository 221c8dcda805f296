//! Todo service.
//!
//! ```text
//!     Client ──▶ request-id / access log ──▶ router ──▶ handlers ──▶ SQLite (todos)
//!                                                          │
//!                                                          ├──▶ ServiceMetrics ◀── synthetic producer
//!                                                          │         │
//!                                                          │         └──▶ GET /metrics
//!                                                          └──▶ spans ──▶ OTLP collector
//! ```

use todo_service::config::load_from_env;
use todo_service::lifecycle::signals::shutdown_signal;
use todo_service::Service;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;

    let service = Service::bootstrap(config).await?;
    tracing::info!(
        address = %service.local_addr()?,
        "todo-service v{} listening",
        env!("CARGO_PKG_VERSION")
    );

    service.run_until(shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
