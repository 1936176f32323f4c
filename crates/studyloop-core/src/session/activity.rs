//! Activity verification clock.
//!
//! Confirms a human is still engaged during long focus intervals. A check
//! becomes due every 45 minutes of wall-clock time since the last check
//! (not since session start); once raised, the user has a 5-minute grace
//! window to confirm presence before the run is auto-aborted.
//!
//! The monitor holds no threads or timers of its own -- the engine polls
//! it with the current wall-clock time on each tick, in the same style as
//! the rest of the caller-driven machine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default wall-clock gap between presence checks.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 45 * 60;
/// Default grace window before an unconfirmed check aborts the run.
pub const DEFAULT_GRACE_SECS: u64 = 5 * 60;

/// What the engine should do about presence verification right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    /// Nothing due.
    Quiet,
    /// The check interval elapsed; raise a check.
    CheckDue,
    /// A raised check went unconfirmed past the grace window; abort.
    AbortDue,
}

/// Wall-clock presence-check state.
///
/// At most one check is pending at a time: while a check is pending the
/// interval clock is stopped, so a new interval cannot begin until the
/// pending check is confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityMonitor {
    check_interval_secs: u64,
    grace_secs: u64,
    /// When the current 45-minute interval began. None while disarmed or
    /// while a check is pending.
    interval_started_at: Option<DateTime<Utc>>,
    /// Auto-abort deadline of the pending check, if any.
    pending_deadline: Option<DateTime<Utc>>,
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityMonitor {
    pub fn new() -> Self {
        Self::with_intervals(DEFAULT_CHECK_INTERVAL_SECS, DEFAULT_GRACE_SECS)
    }

    pub fn with_intervals(check_interval_secs: u64, grace_secs: u64) -> Self {
        Self {
            check_interval_secs,
            grace_secs,
            interval_started_at: None,
            pending_deadline: None,
        }
    }

    /// Start the interval clock if it is not already running.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        if self.interval_started_at.is_none() && self.pending_deadline.is_none() {
            self.interval_started_at = Some(now);
        }
    }

    /// Clear every clock. No orphaned deadline survives a reset.
    pub fn disarm(&mut self) {
        self.interval_started_at = None;
        self.pending_deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.interval_started_at.is_some() || self.pending_deadline.is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending_deadline.is_some()
    }

    /// What is due at `now`, without changing state.
    pub fn poll(&self, now: DateTime<Utc>) -> ActivityStatus {
        if let Some(deadline) = self.pending_deadline {
            if now >= deadline {
                return ActivityStatus::AbortDue;
            }
            return ActivityStatus::Quiet;
        }
        if let Some(started) = self.interval_started_at {
            if now - started >= Duration::seconds(self.check_interval_secs as i64) {
                return ActivityStatus::CheckDue;
            }
        }
        ActivityStatus::Quiet
    }

    /// Raise a check: stop the interval clock and arm the abort deadline.
    /// Returns the deadline.
    pub fn raise(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let deadline = now + Duration::seconds(self.grace_secs as i64);
        self.interval_started_at = None;
        self.pending_deadline = Some(deadline);
        deadline
    }

    /// The user confirmed presence: cancel the abort deadline and restart
    /// the interval clock from `now`.
    pub fn confirm(&mut self, now: DateTime<Utc>) {
        self.pending_deadline = None;
        self.interval_started_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mins(n: i64) -> Duration {
        Duration::minutes(n)
    }

    #[test]
    fn quiet_until_interval_elapses() {
        let t0 = Utc::now();
        let mut monitor = ActivityMonitor::new();
        monitor.arm(t0);

        assert_eq!(monitor.poll(t0 + mins(44)), ActivityStatus::Quiet);
        assert_eq!(monitor.poll(t0 + mins(45)), ActivityStatus::CheckDue);
    }

    #[test]
    fn confirm_restarts_interval_from_confirmation() {
        let t0 = Utc::now();
        let mut monitor = ActivityMonitor::new();
        monitor.arm(t0);

        let raised_at = t0 + mins(45);
        monitor.raise(raised_at);
        assert!(monitor.is_pending());

        let confirmed_at = raised_at + mins(2);
        monitor.confirm(confirmed_at);
        assert!(!monitor.is_pending());

        // Interval measured from confirmation, not from session start.
        assert_eq!(monitor.poll(confirmed_at + mins(44)), ActivityStatus::Quiet);
        assert_eq!(monitor.poll(confirmed_at + mins(45)), ActivityStatus::CheckDue);
    }

    #[test]
    fn unconfirmed_check_becomes_abort_after_grace() {
        let t0 = Utc::now();
        let mut monitor = ActivityMonitor::new();
        monitor.arm(t0);

        let deadline = monitor.raise(t0 + mins(45));
        assert_eq!(deadline, t0 + mins(50));
        assert_eq!(monitor.poll(deadline - Duration::seconds(1)), ActivityStatus::Quiet);
        assert_eq!(monitor.poll(deadline), ActivityStatus::AbortDue);
        assert_eq!(
            monitor.poll(deadline + Duration::seconds(1)),
            ActivityStatus::AbortDue
        );
    }

    #[test]
    fn no_new_interval_while_check_pending() {
        let t0 = Utc::now();
        let mut monitor = ActivityMonitor::new();
        monitor.arm(t0);
        monitor.raise(t0 + mins(45));

        // Arming again while pending must not restart the interval clock.
        monitor.arm(t0 + mins(46));
        assert!(monitor.is_pending());
        assert_eq!(monitor.poll(t0 + mins(46)), ActivityStatus::Quiet);
    }

    #[test]
    fn disarm_clears_all_clocks() {
        let t0 = Utc::now();
        let mut monitor = ActivityMonitor::new();
        monitor.arm(t0);
        monitor.raise(t0 + mins(45));

        monitor.disarm();
        assert!(!monitor.is_armed());
        assert!(!monitor.is_pending());
        assert_eq!(monitor.poll(t0 + mins(100)), ActivityStatus::Quiet);
    }
}
