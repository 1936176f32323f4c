//! Session handoff.
//!
//! Decides what happens to an accrued run when the caller stops it: runs
//! shorter than one full minute are dropped outright, anything longer is
//! offered for save-or-discard. Points already granted during the run are
//! never reversed -- only the session record is at stake here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::FocusSessionRun;
use super::mode::SessionMode;
use crate::collab::SessionStore;
use crate::error::CoreError;

/// Minimum studied time worth a save prompt.
pub const MIN_SAVABLE_SECS: u64 = 60;

/// Outcome of a reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetDecision {
    /// Fewer than one full minute studied; nothing worth recording.
    Discard,
    /// Offer the caller save-or-discard.
    PromptSave {
        elapsed_focus_secs: u64,
        duration_min: u64,
    },
}

/// Decide what a reset at `elapsed_focus_secs` should do.
pub fn decide_reset(elapsed_focus_secs: u64) -> ResetDecision {
    if elapsed_focus_secs < MIN_SAVABLE_SECS {
        ResetDecision::Discard
    } else {
        ResetDecision::PromptSave {
            elapsed_focus_secs,
            duration_min: elapsed_focus_secs / 60,
        }
    }
}

/// A persisted study session.
///
/// `points_earned` covers per-minute points only; milestone and completion
/// bonuses live in the ledger and are not duplicated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSessionRecord {
    pub name: String,
    pub duration_min: u64,
    pub mode: SessionMode,
    pub points_earned: u64,
    pub created_at: DateTime<Utc>,
}

/// Build the record for a finished run.
///
/// With no explicit name, the next sequential label is requested from the
/// store (count-then-name; a documented race under concurrent saves).
pub fn build_record(
    run: &FocusSessionRun,
    name: Option<String>,
    store: &dyn SessionStore,
    created_at: DateTime<Utc>,
) -> Result<SavedSessionRecord, CoreError> {
    let name = match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => store.next_sequential_name()?,
    };
    Ok(SavedSessionRecord {
        name,
        duration_min: run.elapsed_focus_secs / 60,
        mode: run.mode,
        points_earned: run.tally.last_awarded_minute,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::recorders::RecordingSessions;

    fn run_with_elapsed(secs: u64) -> FocusSessionRun {
        let mut run = FocusSessionRun::fresh(SessionMode::Short);
        run.elapsed_focus_secs = secs;
        run.tally.last_awarded_minute = secs / 60;
        run
    }

    #[test]
    fn sub_minute_runs_discard() {
        assert_eq!(decide_reset(0), ResetDecision::Discard);
        assert_eq!(decide_reset(45), ResetDecision::Discard);
        assert_eq!(decide_reset(59), ResetDecision::Discard);
    }

    #[test]
    fn full_minute_runs_prompt() {
        assert_eq!(
            decide_reset(125),
            ResetDecision::PromptSave {
                elapsed_focus_secs: 125,
                duration_min: 2,
            }
        );
    }

    #[test]
    fn record_floors_duration_and_copies_minute_points() {
        let store = RecordingSessions::default();
        let run = run_with_elapsed(125);
        let record = build_record(&run, Some("Algebra".into()), &store, Utc::now()).unwrap();
        assert_eq!(record.name, "Algebra");
        assert_eq!(record.duration_min, 2);
        assert_eq!(record.points_earned, 2);
        assert_eq!(record.mode, SessionMode::Short);
    }

    #[test]
    fn blank_name_falls_back_to_sequential() {
        let store = RecordingSessions::default();
        let run = run_with_elapsed(600);
        let record = build_record(&run, Some("   ".into()), &store, Utc::now()).unwrap();
        assert_eq!(record.name, "Session 1");

        store.save(&record).unwrap();
        let second = build_record(&run, None, &store, Utc::now()).unwrap();
        assert_eq!(second.name, "Session 2");
    }
}
