//! Cleanup tasks run by a sweep
//!
//! Each task selects candidate ids first and then applies its mutation to
//! them. Selection only reads; applying twice with no new eligible rows
//! affects nothing.

use chrono::{DateTime, Utc};
use reclaim_domain::trashable::DATE_DELETED;
use reclaim_domain::{DeletionPlan, Filter, RecordId, RecordStore, RetentionPolicy, Table, TrashableKind};
use std::fmt;

/// Inputs shared by every task of one sweep
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    /// Instant the sweep started; every cutoff derives from it
    pub now: DateTime<Utc>,
    /// Resolved retention windows
    pub policy: &'a RetentionPolicy,
    /// Maximum ids per statement
    pub batch_size: usize,
}

/// One unit of sweep work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleanupTask {
    /// Soft-delete pending users whose verification code expired
    PurgePendingUsers,
    /// Hard-delete sessions idle for more than three months
    DeleteStaleSessions,
    /// Hard-delete trashed rows of one kind, dependents included
    PurgeTrashed(TrashableKind),
}

impl CleanupTask {
    /// The fixed task order of a sweep
    pub fn sequence() -> Vec<CleanupTask> {
        let mut tasks = vec![CleanupTask::PurgePendingUsers, CleanupTask::DeleteStaleSessions];
        tasks.extend(TrashableKind::ALL.into_iter().map(CleanupTask::PurgeTrashed));
        tasks
    }

    /// Stable task name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            CleanupTask::PurgePendingUsers => "pending_users",
            CleanupTask::DeleteStaleSessions => "stale_sessions",
            CleanupTask::PurgeTrashed(TrashableKind::Elements) => "trashed_elements",
            CleanupTask::PurgeTrashed(TrashableKind::EntryTypes) => "trashed_entry_types",
            CleanupTask::PurgeTrashed(TrashableKind::Sections) => "trashed_sections",
            CleanupTask::PurgeTrashed(TrashableKind::Volumes) => "trashed_volumes",
        }
    }

    /// Ids this task would act on right now
    pub fn select_candidates<S: RecordStore>(
        &self,
        store: &S,
        ctx: &TaskContext<'_>,
    ) -> Result<Vec<RecordId>, S::Error> {
        match self {
            CleanupTask::PurgePendingUsers => {
                let Some(cutoff) = ctx.policy.pending_user_cutoff(ctx.now) else {
                    return Ok(Vec::new());
                };

                let expired = store.select_ids(
                    Table::Users,
                    &Filter::all()
                        .is_true("pending")
                        .before("verificationCodeIssuedDate", cutoff),
                )?;

                // Users already in the trash keep their original dateDeleted
                let mut candidates = Vec::new();
                for chunk in expired.chunks(ctx.batch_size) {
                    candidates.extend(store.select_ids(
                        Table::Elements,
                        &Filter::all().id_in("id", chunk).is_null(DATE_DELETED),
                    )?);
                }
                Ok(candidates)
            }
            CleanupTask::DeleteStaleSessions => store.select_ids(
                Table::Sessions,
                &Filter::all().before("dateUpdated", ctx.policy.session_cutoff(ctx.now)),
            ),
            CleanupTask::PurgeTrashed(kind) => {
                store.select_ids(kind.parent(), &trashed_filter(ctx))
            }
        }
    }

    /// Apply the task to `candidates`; returns rows soft- or hard-deleted
    ///
    /// Hard deletes count dependent rows too.
    pub fn apply<S: RecordStore>(
        &self,
        store: &mut S,
        candidates: &[RecordId],
        ctx: &TaskContext<'_>,
    ) -> Result<usize, S::Error> {
        if candidates.is_empty() {
            return Ok(0);
        }

        match self {
            CleanupTask::PurgePendingUsers => {
                let mut affected = 0;
                for chunk in candidates.chunks(ctx.batch_size) {
                    affected += store.set_timestamp(
                        Table::Elements,
                        DATE_DELETED,
                        ctx.now,
                        &Filter::all().id_in("id", chunk).is_null(DATE_DELETED),
                    )?;
                }
                Ok(affected)
            }
            CleanupTask::DeleteStaleSessions => {
                // One bulk conditional delete; rows that went stale since
                // selection are swept along
                store.delete(
                    Table::Sessions,
                    &Filter::all().before("dateUpdated", ctx.policy.session_cutoff(ctx.now)),
                )
            }
            CleanupTask::PurgeTrashed(kind) => {
                let plan = kind.plan();
                let mut affected = 0;

                for chunk in candidates.chunks(ctx.batch_size) {
                    affected += store.delete_batch(&purge_steps(&plan, chunk, ctx))?;
                }
                Ok(affected)
            }
        }
    }
}

fn trashed_filter(ctx: &TaskContext<'_>) -> Filter {
    with_trashed_check(Filter::all(), ctx)
}

fn with_trashed_check(filter: Filter, ctx: &TaskContext<'_>) -> Filter {
    match ctx.policy.trashed_cutoff(ctx.now) {
        Some(cutoff) => filter.before(DATE_DELETED, cutoff),
        None => filter.not_null(DATE_DELETED),
    }
}

/// Delete statements for one chunk of parent ids, dependents first
///
/// Every step re-checks the parent's eligibility through a sub-select, so a
/// parent restored after selection keeps all of its rows.
fn purge_steps(
    plan: &DeletionPlan,
    chunk: &[RecordId],
    ctx: &TaskContext<'_>,
) -> Vec<(Table, Filter)> {
    let eligible = with_trashed_check(Filter::all().id_in(plan.key, chunk), ctx);

    let mut steps: Vec<(Table, Filter)> = plan
        .dependents
        .iter()
        .map(|dep| {
            let (mut table, mut key, mut filter) = (plan.parent, plan.key, eligible.clone());
            for link in dep.through {
                filter = Filter::all().in_select(link.column, table, key, filter);
                table = link.table;
                key = "id";
            }
            (dep.table, Filter::all().in_select(dep.column, table, key, filter))
        })
        .collect();
    steps.push((plan.parent, eligible));
    steps
}

impl fmt::Display for CleanupTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
