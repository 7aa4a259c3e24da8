//! Completion hook for sweeps

use crate::SweepReport;

/// Reacts to a completed sweep
///
/// Observers run synchronously, in registration order, once per completed
/// sweep. They never run for a skipped or failed sweep. Closures taking
/// `&SweepReport` implement this trait.
///
/// # Examples
///
/// ```
/// use reclaim_janitor::{Janitor, SweepReport};
///
/// let mut janitor = Janitor::default_config();
/// janitor.subscribe(|report: &SweepReport| {
///     println!("sweep removed {} rows", report.total_affected());
/// });
/// ```
pub trait SweepObserver {
    /// Called after every task of a sweep succeeded
    fn on_sweep_completed(&self, report: &SweepReport);
}

impl<F> SweepObserver for F
where
    F: Fn(&SweepReport),
{
    fn on_sweep_completed(&self, report: &SweepReport) {
        self(report)
    }
}
