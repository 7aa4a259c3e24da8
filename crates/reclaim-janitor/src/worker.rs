//! Background worker: sweeps on a fixed interval instead of by probability

use crate::{Janitor, JanitorConfig, JanitorError, JanitorMetrics};
use reclaim_domain::RecordStore;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Background worker that runs the Janitor on a schedule
///
/// Every tick forces a sweep. Failed sweeps are logged and the worker keeps
/// going; the next tick retries with fresh cutoffs.
///
/// # Examples
///
/// ```no_run
/// use reclaim_janitor::{JanitorWorker, JanitorConfig};
/// use reclaim_store::SqliteStore;
/// use tokio;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new("reclaim.db")?;
///     let mut worker = JanitorWorker::new(JanitorConfig::default())?;
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run(store).await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker {
    janitor: Janitor,
    interval: Duration,
}

impl JanitorWorker {
    /// Create a new background worker with the given configuration
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        Ok(Self::from_janitor(Janitor::new(config)?))
    }

    /// Wrap an existing Janitor (custom clock, observers)
    pub fn from_janitor(janitor: Janitor) -> Self {
        let interval = janitor.config().sweep_interval();
        Self { janitor, interval }
    }

    /// Run the worker indefinitely
    ///
    /// Sweeps at the configured interval until a shutdown signal (Ctrl+C) is
    /// received.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown signal cannot be listened for.
    pub async fn run<S>(&mut self, mut store: S) -> Result<(), JanitorError>
    where
        S: RecordStore,
        S::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval = ?self.interval, "Janitor worker started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting sweep cycle");

                    match self.janitor.sweep(&mut store) {
                        Ok(report) => {
                            tracing::info!(affected = report.total_affected(), "Sweep cycle completed");
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Sweep cycle failed");
                        }
                    }
                }
                signal = tokio::signal::ctrl_c() => {
                    signal.map_err(|e| JanitorError::Worker(format!("Failed to listen for shutdown: {}", e)))?;
                    tracing::info!("Shutdown signal received, stopping janitor");
                    break;
                }
            }
        }

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.janitor.metrics().summary());

        Ok(())
    }

    /// Run for a specific number of cycles (useful for testing and cron jobs)
    ///
    /// Unlike [`run`](Self::run), a failed sweep stops the worker and is returned.
    pub async fn run_cycles<S>(&mut self, mut store: S, cycles: usize) -> Result<(), JanitorError>
    where
        S: RecordStore,
        S::Error: std::fmt::Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!(cycles, interval = ?self.interval, "Janitor worker started");

        for cycle in 1..=cycles {
            ticker.tick().await;

            tracing::debug!("Starting sweep cycle {}/{}", cycle, cycles);

            match self.janitor.sweep(&mut store) {
                Ok(report) => {
                    tracing::info!(
                        affected = report.total_affected(),
                        "Sweep {}/{} completed",
                        cycle,
                        cycles
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Sweep {}/{} failed", cycle, cycles);
                    return Err(e);
                }
            }
        }

        tracing::info!(
            "Janitor finished {} cycles. Final metrics:\n{}",
            cycles,
            self.janitor.metrics().summary()
        );

        Ok(())
    }

    /// Get a reference to the janitor's current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        self.janitor.metrics()
    }

    /// Reset the janitor's metrics counters
    pub fn reset_metrics(&mut self) {
        self.janitor.reset_metrics();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use reclaim_domain::{Filter, RecordId, Table};

    // Mock store holding session ids only; deletes drain it
    struct MockStore {
        sessions: Vec<RecordId>,
        broken: bool,
    }

    impl RecordStore for MockStore {
        type Error = String;

        fn select_ids(&self, table: Table, _filter: &Filter) -> Result<Vec<RecordId>, Self::Error> {
            if self.broken {
                return Err("database is locked".to_string());
            }
            Ok(if table == Table::Sessions { self.sessions.clone() } else { Vec::new() })
        }

        fn delete(&mut self, table: Table, _filter: &Filter) -> Result<usize, Self::Error> {
            if table != Table::Sessions {
                return Ok(0);
            }
            let removed = self.sessions.len();
            self.sessions.clear();
            Ok(removed)
        }

        fn set_timestamp(
            &mut self,
            _table: Table,
            _column: &'static str,
            _value: DateTime<Utc>,
            _filter: &Filter,
        ) -> Result<usize, Self::Error> {
            Ok(0)
        }
    }

    fn config() -> JanitorConfig {
        JanitorConfig {
            sweep_interval_secs: 60,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_worker_creation() {
        let worker = JanitorWorker::new(config()).unwrap();
        assert_eq!(worker.metrics().sweep_count, 0);
        assert_eq!(worker.interval, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_invalid_interval_rejected() {
        let config = JanitorConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(JanitorWorker::new(config).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles() {
        let store = MockStore { sessions: vec![RecordId::new(1), RecordId::new(2)], broken: false };
        let mut worker = JanitorWorker::new(config()).unwrap();

        worker.run_cycles(store, 2).await.unwrap();

        assert_eq!(worker.metrics().sweep_count, 2);
        // Only the first cycle found stale sessions
        assert_eq!(worker.metrics().total_affected(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles_stops_on_failure() {
        let store = MockStore { sessions: Vec::new(), broken: true };
        let mut worker = JanitorWorker::new(config()).unwrap();

        let result = worker.run_cycles(store, 3).await;

        assert!(matches!(result, Err(JanitorError::Persistence(_))));
        assert_eq!(worker.metrics().failed_count, 1);
        assert_eq!(worker.metrics().sweep_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_metrics() {
        let store = MockStore { sessions: Vec::new(), broken: false };
        let mut worker = JanitorWorker::new(config()).unwrap();

        worker.run_cycles(store, 1).await.unwrap();
        assert_eq!(worker.metrics().sweep_count, 1);

        worker.reset_metrics();
        assert_eq!(worker.metrics().sweep_count, 0);
    }
}
