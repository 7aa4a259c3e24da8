//! Retention policy - cutoff arithmetic and eligibility predicates
//!
//! Everything here is pure: given "now" and the configured windows, compute
//! the instant before which a row becomes eligible for cleanup.
//!
//! | task | timestamp | window |
//! |------|-----------|--------|
//! | Pending user purge | `verificationCodeIssuedDate` | configurable, disabled by default |
//! | Stale sessions | `dateUpdated` | 3 calendar months, fixed |
//! | Trashed rows | `dateDeleted` | configurable, 30 days by default |
//!
//! Comparisons are strict: a row stamped exactly at the cutoff is kept.

use chrono::{DateTime, Months, TimeDelta, Utc};

/// Default soft-delete window (30 days)
pub const DEFAULT_SOFT_DELETE_SECS: u64 = 30 * 86_400;

/// Fixed session lifetime in calendar months
pub const SESSION_RETENTION_MONTHS: u32 = 3;

/// Convert a window in seconds to a `TimeDelta`, saturating on overflow
pub fn duration_from_secs(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

fn saturating_sub(now: DateTime<Utc>, window: TimeDelta) -> DateTime<Utc> {
    now.checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `now - duration`: pending users issued a code before this are expired
pub fn pending_user_cutoff(now: DateTime<Utc>, duration: TimeDelta) -> DateTime<Utc> {
    saturating_sub(now, duration)
}

/// `now - 3 months`: sessions last updated before this are stale
pub fn session_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(SESSION_RETENTION_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `now - duration`: rows trashed before this may be hard-deleted
pub fn soft_delete_cutoff(now: DateTime<Utc>, duration: TimeDelta) -> DateTime<Utc> {
    saturating_sub(now, duration)
}

/// Strictly older than the cutoff; a missing timestamp never qualifies
pub fn is_older_than(ts: Option<DateTime<Utc>>, cutoff: DateTime<Utc>) -> bool {
    matches!(ts, Some(ts) if ts < cutoff)
}

/// A pending user whose verification code was issued before the cutoff
pub fn is_pending_user_eligible(
    pending: bool,
    issued: Option<DateTime<Utc>>,
    cutoff: DateTime<Utc>,
) -> bool {
    pending && is_older_than(issued, cutoff)
}

/// A trashed row past its window
///
/// `cutoff == None` means "delete all trashed": any non-null `dateDeleted`
/// qualifies.
pub fn is_trashed_eligible(date_deleted: Option<DateTime<Utc>>, cutoff: Option<DateTime<Utc>>) -> bool {
    match cutoff {
        Some(cutoff) => is_older_than(date_deleted, cutoff),
        None => date_deleted.is_some(),
    }
}

/// Retention windows resolved from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionPolicy {
    /// Pending-user window; `None` disables the purge
    pub purge_pending_users: Option<TimeDelta>,

    /// Soft-delete to hard-delete window
    pub soft_delete: TimeDelta,

    /// Ignore `soft_delete` and purge every trashed row
    pub delete_all_trashed: bool,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            purge_pending_users: None,
            soft_delete: duration_from_secs(DEFAULT_SOFT_DELETE_SECS),
            delete_all_trashed: false,
        }
    }
}

impl RetentionPolicy {
    /// Cutoff for the pending-user purge, or `None` when disabled
    pub fn pending_user_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.purge_pending_users
            .map(|window| pending_user_cutoff(now, window))
    }

    /// Cutoff for stale sessions
    pub fn session_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        session_cutoff(now)
    }

    /// Cutoff for trashed rows, or `None` when every trashed row qualifies
    pub fn trashed_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.delete_all_trashed {
            None
        } else {
            Some(soft_delete_cutoff(now, self.soft_delete))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        now() - TimeDelta::days(days)
    }

    #[test]
    fn test_session_cutoff_is_three_calendar_months() {
        assert_eq!(
            session_cutoff(now()),
            Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
        );
        // Month-end clamps instead of spilling into the next month
        let may_31 = Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap();
        assert_eq!(
            session_cutoff(may_31),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_sessions_four_months_old_are_stale() {
        let cutoff = session_cutoff(now());
        let four_months = now().checked_sub_months(Months::new(4)).unwrap();
        let two_months = now().checked_sub_months(Months::new(2)).unwrap();
        assert!(is_older_than(Some(four_months), cutoff));
        assert!(!is_older_than(Some(two_months), cutoff));
    }

    #[test]
    fn test_zero_duration_cutoff_is_now() {
        assert_eq!(soft_delete_cutoff(now(), TimeDelta::zero()), now());
        assert!(is_older_than(Some(now() - TimeDelta::seconds(1)), now()));
        assert!(!is_older_than(Some(now()), now()));
    }

    #[test]
    fn test_null_timestamp_never_eligible() {
        assert!(!is_older_than(None, now()));
        assert!(!is_pending_user_eligible(true, None, now()));
        assert!(!is_trashed_eligible(None, Some(now())));
        assert!(!is_trashed_eligible(None, None));
    }

    #[test]
    fn test_pending_user_requires_pending_flag() {
        let cutoff = pending_user_cutoff(now(), TimeDelta::days(2));
        assert!(is_pending_user_eligible(true, Some(days_ago(3)), cutoff));
        assert!(!is_pending_user_eligible(false, Some(days_ago(3)), cutoff));
        assert!(!is_pending_user_eligible(true, Some(days_ago(1)), cutoff));
    }

    #[test]
    fn test_default_policy_windows() {
        let policy = RetentionPolicy::default();
        assert_eq!(policy.pending_user_cutoff(now()), None);

        let cutoff = policy.trashed_cutoff(now());
        assert!(is_trashed_eligible(Some(days_ago(40)), cutoff));
        assert!(!is_trashed_eligible(Some(days_ago(25)), cutoff));
    }

    #[test]
    fn test_custom_soft_delete_window() {
        let policy = RetentionPolicy {
            soft_delete: duration_from_secs(5 * 86_400),
            ..Default::default()
        };
        let cutoff = policy.trashed_cutoff(now());
        assert!(is_trashed_eligible(Some(days_ago(40)), cutoff));
        assert!(is_trashed_eligible(Some(days_ago(25)), cutoff));
        assert!(!is_trashed_eligible(Some(now()), cutoff));
    }

    #[test]
    fn test_delete_all_trashed_ignores_age() {
        let policy = RetentionPolicy {
            delete_all_trashed: true,
            ..Default::default()
        };
        let cutoff = policy.trashed_cutoff(now());
        assert_eq!(cutoff, None);
        assert!(is_trashed_eligible(Some(now()), cutoff));
        assert!(is_trashed_eligible(Some(days_ago(25)), cutoff));
    }

    #[test]
    fn test_huge_window_saturates() {
        let window = duration_from_secs(u64::MAX);
        assert_eq!(soft_delete_cutoff(now(), window), DateTime::<Utc>::MIN_UTC);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a cutoff never lies in the future
        #[test]
        fn test_cutoff_not_after_now(now_secs in 0i64..4_000_000_000i64, window in 0u64..=u64::MAX) {
            let now = DateTime::<Utc>::from_timestamp(now_secs, 0).unwrap();
            prop_assert!(soft_delete_cutoff(now, duration_from_secs(window)) <= now);
            prop_assert!(session_cutoff(now) < now);
        }

        /// Property: a row eligible under a long window is eligible under any shorter one
        #[test]
        fn test_eligibility_monotonic_in_window(
            age in 0i64..10_000_000i64,
            short in 0u64..5_000_000u64,
            extra in 0u64..5_000_000u64,
        ) {
            let now = DateTime::<Utc>::from_timestamp(2_000_000_000, 0).unwrap();
            let deleted = Some(now - TimeDelta::seconds(age));
            let long_cutoff = soft_delete_cutoff(now, duration_from_secs(short + extra));
            let short_cutoff = soft_delete_cutoff(now, duration_from_secs(short));
            if is_trashed_eligible(deleted, Some(long_cutoff)) {
                prop_assert!(is_trashed_eligible(deleted, Some(short_cutoff)));
            }
        }

        /// Property: delete-all dominates every age-based cutoff
        #[test]
        fn test_delete_all_dominates(age in 0i64..10_000_000i64, window in 0u64..10_000_000u64) {
            let now = DateTime::<Utc>::from_timestamp(2_000_000_000, 0).unwrap();
            let deleted = Some(now - TimeDelta::seconds(age));
            let cutoff = soft_delete_cutoff(now, duration_from_secs(window));
            if is_trashed_eligible(deleted, Some(cutoff)) {
                prop_assert!(is_trashed_eligible(deleted, None));
            }
        }
    }
}
