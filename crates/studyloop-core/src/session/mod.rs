mod activity;
mod engine;
mod handoff;
mod mode;
mod outbox;
mod points;
mod visibility;

pub use activity::{ActivityMonitor, ActivityStatus};
pub use engine::{FocusEngine, FocusSessionRun, SessionKind, TimerState};
pub use handoff::{decide_reset, ResetDecision, SavedSessionRecord, MIN_SAVABLE_SECS};
pub use mode::{ModeCatalog, ModeProfile, SessionMode, MILESTONE_INTERVAL_MIN};
pub use outbox::{dispatch, AwardIntent, AwardOutbox, DeliveryFailure};
pub use points::{accrue, AwardKind, AwardTally, PointAward};
pub use visibility::VisibilityBridge;
