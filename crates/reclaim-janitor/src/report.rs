//! Per-sweep results

use crate::CleanupTask;
use chrono::{DateTime, Utc};

/// Outcome of one task within a sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    /// Task that ran
    pub task: CleanupTask,
    /// Ids selected as eligible
    pub candidates: usize,
    /// Rows changed (0 in dry-run mode)
    pub affected: usize,
}

/// Result of one completed sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Instant all cutoffs were computed from
    pub started_at: DateTime<Utc>,
    /// Whether mutations were suppressed
    pub dry_run: bool,
    /// Task results, in execution order
    pub tasks: Vec<TaskReport>,
}

impl SweepReport {
    /// Empty report for a sweep starting at `started_at`
    pub fn new(started_at: DateTime<Utc>, dry_run: bool) -> Self {
        Self {
            started_at,
            dry_run,
            tasks: Vec::new(),
        }
    }

    /// Rows changed by `task`
    pub fn affected(&self, task: CleanupTask) -> usize {
        self.find(task).map_or(0, |t| t.affected)
    }

    /// Candidates selected by `task`
    pub fn candidates(&self, task: CleanupTask) -> usize {
        self.find(task).map_or(0, |t| t.candidates)
    }

    /// Rows changed across all tasks
    pub fn total_affected(&self) -> usize {
        self.tasks.iter().map(|t| t.affected).sum()
    }

    /// Candidates across all tasks
    pub fn total_candidates(&self) -> usize {
        self.tasks.iter().map(|t| t.candidates).sum()
    }

    fn find(&self, task: CleanupTask) -> Option<&TaskReport> {
        self.tasks.iter().find(|t| t.task == task)
    }
}

/// What `Janitor::run` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The probability check failed; nothing ran and no observer fired
    Skipped,
    /// Every task ran
    Completed(SweepReport),
}

impl SweepOutcome {
    /// True if the sweep ran
    pub fn is_completed(&self) -> bool {
        matches!(self, SweepOutcome::Completed(_))
    }

    /// The report of a completed sweep
    pub fn report(&self) -> Option<&SweepReport> {
        match self {
            SweepOutcome::Completed(report) => Some(report),
            SweepOutcome::Skipped => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_domain::TrashableKind;

    #[test]
    fn test_report_totals() {
        let mut report = SweepReport::new(Utc::now(), false);
        report.tasks.push(TaskReport {
            task: CleanupTask::DeleteStaleSessions,
            candidates: 4,
            affected: 4,
        });
        report.tasks.push(TaskReport {
            task: CleanupTask::PurgeTrashed(TrashableKind::Elements),
            candidates: 2,
            affected: 7,
        });

        assert_eq!(report.total_candidates(), 6);
        assert_eq!(report.total_affected(), 11);
        assert_eq!(report.affected(CleanupTask::PurgePendingUsers), 0);
        assert_eq!(report.candidates(CleanupTask::PurgeTrashed(TrashableKind::Elements)), 2);
    }

    #[test]
    fn test_outcome_accessors() {
        assert!(!SweepOutcome::Skipped.is_completed());
        assert!(SweepOutcome::Skipped.report().is_none());

        let outcome = SweepOutcome::Completed(SweepReport::new(Utc::now(), true));
        assert!(outcome.is_completed());
        assert!(outcome.report().unwrap().dry_run);
    }
}
