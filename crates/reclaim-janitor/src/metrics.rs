//! Metrics collection for Janitor operations

use crate::{CleanupTask, SweepReport};
use std::collections::HashMap;

/// Metrics accumulated across sweeps
///
/// Tracks rows affected per task and how many runs completed, were skipped
/// by the probability check, or failed.
#[derive(Debug, Clone, Default)]
pub struct JanitorMetrics {
    /// Rows affected per task
    pub affected: HashMap<CleanupTask, usize>,

    /// Completed sweeps
    pub sweep_count: usize,

    /// Unforced runs that lost the probability draw
    pub skipped_count: usize,

    /// Sweeps aborted by a store error
    pub failed_count: usize,

    /// Total sweep runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record rows affected by a task
    pub fn record_task(&mut self, task: CleanupTask, count: usize) {
        *self.affected.entry(task).or_insert(0) += count;
    }

    /// Fold a completed sweep in
    pub fn record_sweep(&mut self, report: &SweepReport, runtime_ms: u64) {
        for task in &report.tasks {
            self.record_task(task.task, task.affected);
        }
        self.sweep_count += 1;
        self.total_runtime_ms += runtime_ms;
    }

    /// Record a skipped run
    pub fn record_skip(&mut self) {
        self.skipped_count += 1;
    }

    /// Record an aborted sweep
    pub fn record_failure(&mut self) {
        self.failed_count += 1;
    }

    /// Get total rows affected across all tasks
    pub fn total_affected(&self) -> usize {
        self.affected.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Sweeps completed: {}", self.sweep_count),
            format!("Runs skipped: {}", self.skipped_count),
            format!("Sweeps failed: {}", self.failed_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
        ];

        if !self.affected.is_empty() {
            lines.push(String::new());
            lines.push("Rows affected by task:".to_string());
            // Report in sweep order rather than hash order
            for task in CleanupTask::sequence() {
                if let Some(count) = self.affected.get(&task) {
                    lines.push(format!("  {}: {}", task, count));
                }
            }
            lines.push(format!("  Total: {}", self.total_affected()));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskReport;
    use chrono::Utc;
    use reclaim_domain::TrashableKind;

    #[test]
    fn test_metrics_creation() {
        let metrics = JanitorMetrics::new();
        assert_eq!(metrics.total_affected(), 0);
        assert_eq!(metrics.sweep_count, 0);
        assert_eq!(metrics.skipped_count, 0);
    }

    #[test]
    fn test_record_task() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_task(CleanupTask::DeleteStaleSessions, 5);
        metrics.record_task(CleanupTask::PurgePendingUsers, 3);
        metrics.record_task(CleanupTask::DeleteStaleSessions, 2);

        assert_eq!(metrics.affected[&CleanupTask::DeleteStaleSessions], 7);
        assert_eq!(metrics.affected[&CleanupTask::PurgePendingUsers], 3);
        assert_eq!(metrics.total_affected(), 10);
    }

    #[test]
    fn test_record_sweep() {
        let mut metrics = JanitorMetrics::new();
        let mut report = SweepReport::new(Utc::now(), false);
        report.tasks.push(TaskReport {
            task: CleanupTask::PurgeTrashed(TrashableKind::Volumes),
            candidates: 1,
            affected: 3,
        });

        metrics.record_sweep(&report, 12);
        metrics.record_sweep(&report, 8);

        assert_eq!(metrics.sweep_count, 2);
        assert_eq!(metrics.total_runtime_ms, 20);
        assert_eq!(metrics.total_affected(), 6);
    }

    #[test]
    fn test_reset() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_task(CleanupTask::DeleteStaleSessions, 10);
        metrics.record_skip();
        metrics.record_failure();

        metrics.reset();

        assert_eq!(metrics.total_affected(), 0);
        assert_eq!(metrics.skipped_count, 0);
        assert_eq!(metrics.failed_count, 0);
    }

    #[test]
    fn test_summary() {
        let mut metrics = JanitorMetrics::new();
        metrics.record_task(CleanupTask::DeleteStaleSessions, 5);
        metrics.record_task(CleanupTask::PurgeTrashed(TrashableKind::Sections), 2);
        metrics.record_skip();
        metrics.total_runtime_ms = 120;

        let summary = metrics.summary();
        assert!(summary.contains("Runs skipped: 1"));
        assert!(summary.contains("Total runtime: 120ms"));
        assert!(summary.contains("stale_sessions: 5"));
        assert!(summary.contains("trashed_sections: 2"));
        assert!(summary.contains("Total: 7"));
    }
}
