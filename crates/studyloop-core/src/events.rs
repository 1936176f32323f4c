use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{AwardKind, SessionKind, SessionMode, TimerState};

/// Every state change in the engine produces an Event.
/// The host polls for events and renders feedback (sounds, prompts, UI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        mode: SessionMode,
        kind: SessionKind,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u64,
        elapsed_focus_secs: u64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The run was dropped and the engine returned to idle.
    SessionReset {
        at: DateTime<Utc>,
    },
    /// A fixed-duration focus interval counted down to zero.
    FocusCompleted {
        mode: SessionMode,
        sessions_completed: u32,
        at: DateTime<Utc>,
    },
    BreakStarted {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    BreakFinished {
        at: DateTime<Utc>,
    },
    /// Points were granted (per-minute, milestone, or completion bonus).
    PointsAwarded {
        amount: u32,
        kind: AwardKind,
        /// Whole focus minute the award belongs to.
        minute: u64,
        at: DateTime<Utc>,
    },
    /// Presence check fired; the engine paused itself and armed the
    /// auto-abort clock.
    ActivityCheckRaised {
        deadline: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// The user confirmed presence before the auto-abort deadline.
    ActivityCheckResolved {
        at: DateTime<Utc>,
    },
    /// The auto-abort deadline passed without confirmation; the run was
    /// discarded.
    SessionAutoAborted {
        elapsed_focus_secs: u64,
        at: DateTime<Utc>,
    },
    /// At least one full minute was studied; the caller should offer
    /// save-or-discard.
    SavePromptRequested {
        elapsed_focus_secs: u64,
        duration_min: u64,
        at: DateTime<Utc>,
    },
    SessionSaved {
        name: String,
        duration_min: u64,
        points_earned: u64,
        at: DateTime<Utc>,
    },
    SessionDiscarded {
        at: DateTime<Utc>,
    },
    /// The host lost foreground visibility while focus was running; a
    /// persistent floating timer view should be shown.
    FloatingTimerRequested {
        remaining_secs: u64,
        elapsed_focus_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: SessionMode,
        kind: SessionKind,
        remaining_secs: u64,
        elapsed_focus_secs: u64,
        minute_points: u64,
        sessions_completed: u32,
        activity_check_pending: bool,
        awaiting_save: bool,
        at: DateTime<Utc>,
    },
}
