//! Point accrual rules.
//!
//! Pure function of elapsed focus seconds and the mode profile, invoked by
//! the engine once per focus tick. The tally is updated synchronously here,
//! before any award leaves the process, so a slow or failed ledger call can
//! never cause a duplicate award.

use serde::{Deserialize, Serialize};

use super::mode::ModeProfile;

/// Classification of a point award, recorded with the ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AwardKind {
    /// One point per completed focus minute.
    MinuteStudy,
    /// Bonus per milestone interval in infinite mode.
    InfiniteMilestone,
    /// Bonus when a fixed-duration focus interval finishes.
    SessionComplete,
}

impl AwardKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AwardKind::MinuteStudy => "minute-study",
            AwardKind::InfiniteMilestone => "infinite-milestone",
            AwardKind::SessionComplete => "session-complete",
        }
    }
}

/// High-water marks for awards already granted during a run.
///
/// Invariants: `last_awarded_minute <= elapsed_focus_secs / 60` and
/// `milestones_awarded <= last_awarded_minute / milestone_interval_min`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardTally {
    /// Last whole minute for which a per-minute point was granted.
    pub last_awarded_minute: u64,
    /// Count of milestone bonuses already granted.
    pub milestones_awarded: u64,
}

/// One award produced by accrual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAward {
    pub amount: u32,
    pub kind: AwardKind,
    /// Whole focus minute the award belongs to.
    pub minute: u64,
}

/// Compute awards owed for the current elapsed focus time and advance the
/// tally past them.
///
/// Exactly one minute-study point per completed minute and exactly one
/// milestone bonus per boundary crossed, looping until caught up, so no
/// award is duplicated or skipped even if several boundaries pass between
/// calls.
pub fn accrue(profile: &ModeProfile, elapsed_focus_secs: u64, tally: &mut AwardTally) -> Vec<PointAward> {
    let mut awards = Vec::new();
    let current_minute = elapsed_focus_secs / 60;

    while tally.last_awarded_minute < current_minute {
        tally.last_awarded_minute += 1;
        awards.push(PointAward {
            amount: 1,
            kind: AwardKind::MinuteStudy,
            minute: tally.last_awarded_minute,
        });
    }

    if profile.milestone_bonus > 0 {
        let milestone_number = current_minute / profile.milestone_interval_min;
        while tally.milestones_awarded < milestone_number {
            tally.milestones_awarded += 1;
            awards.push(PointAward {
                amount: profile.milestone_bonus,
                kind: AwardKind::InfiniteMilestone,
                minute: tally.milestones_awarded * profile.milestone_interval_min,
            });
        }
    }

    awards
}
