//! Core Janitor implementation: the probabilistic trigger and the sweep

use crate::config::MAX_PROBABILITY;
use crate::task::TaskContext;
use crate::{
    CleanupTask, JanitorConfig, JanitorError, JanitorMetrics, SweepObserver, SweepOutcome,
    SweepReport, TaskReport,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reclaim_domain::{Clock, RecordStore, RetentionPolicy, SystemClock, TrashableKind};
use std::time::Instant;

/// Janitor service for retention sweeps
///
/// Responsible for:
/// - Deciding whether an unforced run sweeps (parts-per-million probability)
/// - Soft-deleting pending users whose verification code expired
/// - Deleting stale sessions
/// - Hard-deleting trashed rows past their window, dependents included
/// - Notifying observers once a sweep completed
///
/// Configuration is fixed at construction; between runs the Janitor only
/// carries metrics and its random source.
///
/// # Examples
///
/// ```no_run
/// use reclaim_janitor::{Janitor, JanitorConfig};
/// use reclaim_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new(":memory:")?;
/// let mut janitor = Janitor::new(JanitorConfig::default())?;
///
/// // Called on every request: sweeps roughly once in 100,000 calls
/// janitor.run(&mut store, false)?;
///
/// // Forced sweep
/// let report = janitor.sweep(&mut store)?;
/// println!("{} rows affected", report.total_affected());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    policy: RetentionPolicy,
    clock: Box<dyn Clock + Send + Sync>,
    rng: StdRng,
    observers: Vec<Box<dyn SweepObserver + Send + Sync>>,
    metrics: JanitorMetrics,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::Configuration`] if the configuration is invalid.
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::build(JanitorConfig::default())
    }

    fn build(config: JanitorConfig) -> Self {
        Self {
            policy: config.policy(),
            config,
            clock: Box::new(SystemClock),
            rng: StdRng::from_entropy(),
            observers: Vec::new(),
            metrics: JanitorMetrics::new(),
        }
    }

    /// Replace the time source
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// Seed the probability draw (reproducible runs)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Register an observer fired after each completed sweep
    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: SweepObserver + Send + Sync + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Get the configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Decide whether a run proceeds
    ///
    /// Forced runs always proceed. Otherwise draw uniformly from
    /// `0..=1_000_000` and proceed when the draw is below `probability`.
    pub fn should_run(&mut self, force: bool) -> bool {
        force || self.rng.gen_range(0..=MAX_PROBABILITY) < self.config.probability
    }

    /// Possibly sweep
    ///
    /// This is the entry point for hosts that amortize maintenance over
    /// requests: call it with `force = false` on every request and let the
    /// probability decide.
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::Persistence`] if a task fails; later tasks are
    /// not attempted and observers are not notified.
    pub fn run<S>(&mut self, store: &mut S, force: bool) -> Result<SweepOutcome, JanitorError>
    where
        S: RecordStore,
        S::Error: std::fmt::Display,
    {
        if !self.should_run(force) {
            self.metrics.record_skip();
            tracing::trace!(probability = self.config.probability, "Sweep skipped");
            return Ok(SweepOutcome::Skipped);
        }

        self.sweep(store).map(SweepOutcome::Completed)
    }

    /// Perform a complete sweep now, ignoring the probability
    ///
    /// Runs every task of [`CleanupTask::sequence`] in order, then notifies
    /// observers.
    pub fn sweep<S>(&mut self, store: &mut S) -> Result<SweepReport, JanitorError>
    where
        S: RecordStore,
        S::Error: std::fmt::Display,
    {
        let start = Instant::now();
        let now = self.clock.now();
        let ctx = TaskContext {
            now,
            policy: &self.policy,
            batch_size: self.config.batch_size,
        };
        let mut report = SweepReport::new(now, self.config.dry_run);

        tracing::debug!(now = %now, dry_run = self.config.dry_run, "Starting sweep");

        for task in CleanupTask::sequence() {
            match run_task(store, task, &ctx, self.config.dry_run) {
                Ok(task_report) => report.tasks.push(task_report),
                Err(e) => {
                    self.metrics.record_failure();
                    tracing::error!(task = %task, error = %e, "Sweep aborted");
                    return Err(e);
                }
            }
        }

        if self.config.dry_run {
            self.count_pending_as_trashed(&mut report);
        }

        let runtime_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.metrics.record_sweep(&report, runtime_ms);

        tracing::info!(
            affected = report.total_affected(),
            candidates = report.total_candidates(),
            dry_run = report.dry_run,
            runtime_ms,
            "Sweep completed"
        );

        for observer in &self.observers {
            observer.on_sweep_completed(&report);
        }

        Ok(report)
    }

    /// Count what a sweep would touch right now, without mutating anything
    ///
    /// With `delete_all_trashed`, pending users soft-deleted by the sweep are
    /// purged by `trashed_elements` in the same sweep; the preview counts
    /// them there too. Observers are not notified and metrics are not updated.
    pub fn preview<S>(&self, store: &S) -> Result<SweepReport, JanitorError>
    where
        S: RecordStore,
        S::Error: std::fmt::Display,
    {
        let now = self.clock.now();
        let ctx = TaskContext {
            now,
            policy: &self.policy,
            batch_size: self.config.batch_size,
        };
        let mut report = SweepReport::new(now, true);

        for task in CleanupTask::sequence() {
            let candidates = task
                .select_candidates(store, &ctx)
                .map_err(|e| persistence(task, e))?;
            report.tasks.push(TaskReport {
                task,
                candidates: candidates.len(),
                affected: 0,
            });
        }

        self.count_pending_as_trashed(&mut report);
        Ok(report)
    }

    /// Add the pending-user candidates to `trashed_elements` when every
    /// trashed row is purged, for reports built without mutating the store
    fn count_pending_as_trashed(&self, report: &mut SweepReport) {
        if self.policy.trashed_cutoff(report.started_at).is_some() {
            return;
        }

        let pending = report.candidates(CleanupTask::PurgePendingUsers);
        let trashed = CleanupTask::PurgeTrashed(TrashableKind::Elements);
        if let Some(task) = report.tasks.iter_mut().find(|t| t.task == trashed) {
            task.candidates += pending;
        }
    }
}

fn persistence<E: std::fmt::Display>(task: CleanupTask, e: E) -> JanitorError {
    JanitorError::Persistence(format!("{}: {}", task, e))
}

fn run_task<S>(
    store: &mut S,
    task: CleanupTask,
    ctx: &TaskContext<'_>,
    dry_run: bool,
) -> Result<TaskReport, JanitorError>
where
    S: RecordStore,
    S::Error: std::fmt::Display,
{
    let candidates = task
        .select_candidates(store, ctx)
        .map_err(|e| persistence(task, e))?;

    if candidates.is_empty() {
        return Ok(TaskReport { task, candidates: 0, affected: 0 });
    }

    if dry_run {
        tracing::info!(
            task = %task,
            candidates = candidates.len(),
            "DRY RUN: Would clean up {} rows",
            candidates.len()
        );
        return Ok(TaskReport { task, candidates: candidates.len(), affected: 0 });
    }

    let affected = task
        .apply(store, &candidates, ctx)
        .map_err(|e| persistence(task, e))?;

    tracing::debug!(task = %task, candidates = candidates.len(), affected, "Task complete");

    Ok(TaskReport { task, candidates: candidates.len(), affected })
}
