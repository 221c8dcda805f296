//! Background producer of user-status samples.

use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::GeneratorConfig;
use crate::observability::{ServiceMetrics, StatusClass};

pub struct StatusProducer {
    metrics: Arc<ServiceMetrics>,
    config: GeneratorConfig,
}

impl StatusProducer {
    pub fn new(metrics: Arc<ServiceMetrics>, config: GeneratorConfig) -> Self {
        Self { metrics, config }
    }

    /// Record one sample every interval until shutdown is signalled.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        if !self.config.enabled {
            tracing::info!("Synthetic status producer disabled");
            return;
        }

        tracing::info!(
            interval = self.config.interval_secs,
            users = ?self.config.users,
            "Synthetic status producer starting"
        );

        let mut ticker = time::interval(Duration::from_secs(self.config.interval_secs));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Synthetic status producer received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    fn tick(&self) {
        let sample = sample(&mut rand::thread_rng(), &self.config.users, self.config.error_ratio);
        if let Some((user, status)) = sample {
            tracing::trace!(user = %user, status = status.as_str(), "Synthetic sample");
            self.metrics.record_user_status(user, status);
        }
    }
}

/// Pick a user uniformly and a status class, `4xx` with probability `error_ratio`.
pub fn sample<'a, R: Rng>(
    rng: &mut R,
    users: &'a [String],
    error_ratio: f64,
) -> Option<(&'a str, StatusClass)> {
    let user = users.choose(rng)?;
    let status = if rng.gen_bool(error_ratio.clamp(0.0, 1.0)) {
        StatusClass::ClientError
    } else {
        StatusClass::Success
    };
    Some((user.as_str(), status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn users() -> Vec<String> {
        GeneratorConfig::default().users
    }

    #[test]
    fn test_sample_distribution() {
        let users = users();
        let mut rng = StdRng::seed_from_u64(7);
        let mut per_user: HashMap<&str, usize> = HashMap::new();
        let mut errors = 0;
        let total = 10_000;

        for _ in 0..total {
            let (user, status) = sample(&mut rng, &users, 0.2).unwrap();
            *per_user.entry(user).or_default() += 1;
            if status == StatusClass::ClientError {
                errors += 1;
            }
        }

        let ratio = errors as f64 / total as f64;
        assert!((0.17..0.23).contains(&ratio), "error ratio {ratio}");
        assert_eq!(per_user.len(), 3);
        for count in per_user.values() {
            assert!(*count > 3000 && *count < 3700, "user count {count}");
        }
    }

    #[test]
    fn test_sample_extremes() {
        let users = users();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample(&mut rng, &users, 0.0).unwrap().1, StatusClass::Success);
        assert_eq!(sample(&mut rng, &users, 1.0).unwrap().1, StatusClass::ClientError);
        assert!(sample(&mut rng, &[], 0.2).is_none());
    }

    #[tokio::test]
    async fn test_producer_records_and_stops_on_shutdown() {
        let metrics = Arc::new(ServiceMetrics::new());
        let config = GeneratorConfig {
            interval_secs: 1,
            ..GeneratorConfig::default()
        };
        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(StatusProducer::new(metrics.clone(), config).run(rx));

        // First tick fires immediately.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(metrics.render().contains("http_request_get_user_status_count{"));

        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("producer exits after shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_disabled_producer_returns_immediately() {
        let metrics = Arc::new(ServiceMetrics::new());
        let config = GeneratorConfig {
            enabled: false,
            ..GeneratorConfig::default()
        };
        let (_tx, rx) = broadcast::channel(1);
        StatusProducer::new(metrics.clone(), config).run(rx).await;
        assert!(!metrics.render().contains("http_request_get_user_status_count{"));
    }
}
