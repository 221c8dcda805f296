//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tempfile::TempDir;
use todo_service::{Service, ServiceConfig};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A running service on an ephemeral port, backed by a throwaway database.
#[allow(dead_code)]
pub struct TestService {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
    _dir: TempDir,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server and producer to exit.
    #[allow(dead_code)]
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), &mut self.task)
            .await
            .expect("service stops after shutdown")
            .expect("service task panicked");
    }
}

/// Config pointing at a temp database, with span export and the producer off.
pub fn test_config(dir: &TempDir) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.store.path = dir.path().join("todos.db").to_string_lossy().into_owned();
    config.observability.tracing_enabled = false;
    config.generator.enabled = false;
    config
}

#[allow(dead_code)]
pub async fn start_service() -> TestService {
    start_service_with(|_| {}).await
}

#[allow(dead_code)]
pub async fn start_service_with(customize: impl FnOnce(&mut ServiceConfig)) -> TestService {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    customize(&mut config);

    let service = Service::assemble(config, None).await.unwrap();
    let addr = service.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        service
            .run_until(async move {
                let _ = stop_rx.await;
            })
            .await
            .unwrap();
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestService {
        addr,
        client,
        stop: Some(stop_tx),
        task,
        _dir: dir,
    }
}
