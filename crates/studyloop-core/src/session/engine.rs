//! Focus session engine.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads or timers -- the host is the sole tick source and is responsible
//! for calling `tick()` once per second while a session runs. Missed ticks
//! are not caught up: after a host sleep the countdown simply resumes from
//! wherever it stood.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed) -> Running -> Idle
//! ```
//!
//! A fixed-duration focus interval that reaches zero passes through
//! `Completed` and immediately re-enters `Running` as a break. The activity
//! monitor can force `Running -> Paused` with an auto-abort deadline.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FocusEngine::new(SessionMode::Short);
//! engine.start(Utc::now());
//! // Once per second:
//! let events = engine.tick(Utc::now());
//! let intents = engine.drain_intents(); // dispatch to collaborators
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::activity::{ActivityMonitor, ActivityStatus};
use super::handoff::{build_record, decide_reset, ResetDecision};
use super::mode::{ModeCatalog, ModeProfile, SessionMode};
use super::outbox::{AwardIntent, AwardOutbox};
use super::points::{accrue, AwardKind, AwardTally};
use crate::collab::SessionStore;
use crate::error::CoreError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Transient: a fixed-duration focus interval just finished. The engine
    /// auto-advances into the break within the same tick.
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Focus,
    Break,
}

/// The mutable aggregate for one in-progress study attempt.
///
/// Owned exclusively by [`FocusEngine`]; nothing else mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSessionRun {
    pub mode: SessionMode,
    pub state: TimerState,
    pub kind: SessionKind,
    /// Counts down for fixed-duration kinds; unused for infinite.
    pub remaining_secs: u64,
    /// Counts up; source of truth for points and milestones.
    pub elapsed_focus_secs: u64,
    pub tally: AwardTally,
    /// Fixed-duration focus intervals that reached zero this visit.
    pub sessions_completed: u32,
    pub activity_check_pending: bool,
    pub started_at: Option<DateTime<Utc>>,
}

impl FocusSessionRun {
    /// A fresh idle run for `mode`.
    pub fn fresh(mode: SessionMode) -> Self {
        Self {
            mode,
            state: TimerState::Idle,
            kind: SessionKind::Focus,
            remaining_secs: mode.profile().focus_secs,
            elapsed_focus_secs: 0,
            tally: AwardTally::default(),
            sessions_completed: 0,
            activity_check_pending: false,
            started_at: None,
        }
    }
}

/// Core session state machine.
///
/// Operates on caller-supplied wall-clock instants -- no internal thread.
/// Serializable so a CLI host can persist it between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusEngine {
    run: FocusSessionRun,
    catalog: ModeCatalog,
    monitor: ActivityMonitor,
    outbox: AwardOutbox,
    /// A reset left at least one full studied minute behind and the caller
    /// has not yet chosen save or discard.
    #[serde(default)]
    awaiting_save: bool,
}

impl FocusEngine {
    /// Create an engine with the built-in mode catalog and default
    /// activity-check intervals.
    pub fn new(mode: SessionMode) -> Self {
        Self::with_parts(mode, ModeCatalog::default(), ActivityMonitor::new())
    }

    /// Create an engine with a configured catalog and monitor.
    pub fn with_parts(mode: SessionMode, catalog: ModeCatalog, monitor: ActivityMonitor) -> Self {
        let mut run = FocusSessionRun::fresh(mode);
        run.remaining_secs = catalog.get(mode).focus_secs;
        Self {
            run,
            catalog,
            monitor,
            outbox: AwardOutbox::default(),
            awaiting_save: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.run.state
    }

    pub fn mode(&self) -> SessionMode {
        self.run.mode
    }

    pub fn kind(&self) -> SessionKind {
        self.run.kind
    }

    pub fn run(&self) -> &FocusSessionRun {
        &self.run
    }

    pub fn profile(&self) -> ModeProfile {
        self.catalog.get(self.run.mode)
    }

    pub fn awaiting_save(&self) -> bool {
        self.awaiting_save
    }

    pub fn activity_check_pending(&self) -> bool {
        self.run.activity_check_pending
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.run.state,
            mode: self.run.mode,
            kind: self.run.kind,
            remaining_secs: self.run.remaining_secs,
            elapsed_focus_secs: self.run.elapsed_focus_secs,
            minute_points: self.run.tally.last_awarded_minute,
            sessions_completed: self.run.sessions_completed,
            activity_check_pending: self.run.activity_check_pending,
            awaiting_save: self.awaiting_save,
            at: Utc::now(),
        }
    }

    /// Take every pending collaborator intent, oldest first.
    pub fn drain_intents(&mut self) -> Vec<AwardIntent> {
        self.outbox.drain()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.awaiting_save || self.run.state != TimerState::Idle {
            return None;
        }
        let profile = self.profile();
        if !profile.is_fixed() {
            // Open-ended runs start counting from zero.
            self.run.elapsed_focus_secs = 0;
            self.run.tally = AwardTally::default();
        }
        self.run.kind = SessionKind::Focus;
        self.run.remaining_secs = profile.focus_secs;
        self.run.state = TimerState::Running;
        if self.run.started_at.is_none() {
            self.run.started_at = Some(now);
        }
        self.monitor.arm(now);
        tracing::debug!(mode = self.run.mode.as_str(), "session started");
        Some(Event::SessionStarted {
            mode: self.run.mode,
            kind: SessionKind::Focus,
            remaining_secs: self.run.remaining_secs,
            at: now,
        })
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run.state != TimerState::Running {
            return None;
        }
        self.run.state = TimerState::Paused;
        Some(Event::SessionPaused {
            remaining_secs: self.run.remaining_secs,
            elapsed_focus_secs: self.run.elapsed_focus_secs,
            at: now,
        })
    }

    /// Resume a user pause. A pause forced by a pending activity check can
    /// only be lifted through [`FocusEngine::confirm_activity`].
    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.run.state != TimerState::Paused || self.run.activity_check_pending {
            return None;
        }
        self.run.state = TimerState::Running;
        Some(Event::SessionResumed {
            remaining_secs: self.run.remaining_secs,
            at: now,
        })
    }

    /// Switch mode. Only allowed while idle with no pending save prompt;
    /// otherwise a silent no-op, preserving the run's mode for its lifetime.
    pub fn set_mode(&mut self, mode: SessionMode) -> bool {
        if self.run.state != TimerState::Idle || self.awaiting_save {
            return false;
        }
        self.run.mode = mode;
        self.run.remaining_secs = self.catalog.get(mode).focus_secs;
        true
    }

    /// The user confirmed presence for a pending activity check.
    pub fn confirm_activity(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        if !self.run.activity_check_pending {
            return Vec::new();
        }
        self.monitor.confirm(now);
        self.run.activity_check_pending = false;
        self.run.state = TimerState::Running;
        vec![
            Event::ActivityCheckResolved { at: now },
            Event::SessionResumed {
                remaining_secs: self.run.remaining_secs,
                at: now,
            },
        ]
    }

    /// Stop the run. Halts the tick loop, clears every activity clock, and
    /// either discards outright (under one studied minute) or requests a
    /// save prompt that [`FocusEngine::save`] / [`FocusEngine::discard`]
    /// must resolve.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        match self.run.state {
            TimerState::Running | TimerState::Paused => {}
            _ => return Vec::new(),
        }
        self.monitor.disarm();
        self.run.activity_check_pending = false;
        self.run.state = TimerState::Idle;
        match decide_reset(self.run.elapsed_focus_secs) {
            ResetDecision::Discard => {
                self.run = FocusSessionRun::fresh(self.run.mode);
                self.run.remaining_secs = self.profile().focus_secs;
                vec![Event::SessionReset { at: now }]
            }
            ResetDecision::PromptSave {
                elapsed_focus_secs,
                duration_min,
            } => {
                self.awaiting_save = true;
                vec![Event::SavePromptRequested {
                    elapsed_focus_secs,
                    duration_min,
                    at: now,
                }]
            }
        }
    }

    /// Persist the stopped run as a session record, then return to a fresh
    /// idle run. No-op unless a save prompt is outstanding. On a store
    /// failure the prompt stays outstanding so the caller may retry or
    /// discard; points already granted are unaffected either way.
    pub fn save(
        &mut self,
        name: Option<String>,
        store: &dyn SessionStore,
        now: DateTime<Utc>,
    ) -> Result<Option<Event>, CoreError> {
        if !self.awaiting_save {
            return Ok(None);
        }
        let record = build_record(&self.run, name, store, now)?;
        store.save(&record)?;
        self.awaiting_save = false;
        self.run = FocusSessionRun::fresh(self.run.mode);
        self.run.remaining_secs = self.profile().focus_secs;
        Ok(Some(Event::SessionSaved {
            name: record.name,
            duration_min: record.duration_min,
            points_earned: record.points_earned,
            at: now,
        }))
    }

    /// Drop the stopped run without a record. Points already granted during
    /// the run are not reversed.
    pub fn discard(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.awaiting_save {
            return None;
        }
        self.awaiting_save = false;
        self.run = FocusSessionRun::fresh(self.run.mode);
        self.run.remaining_secs = self.profile().focus_secs;
        Some(Event::SessionDiscarded { at: now })
    }

    /// Advance the machine by one wall-clock second.
    ///
    /// Drives the countdown, point accrual, and the activity clocks. Also
    /// watches the auto-abort deadline while paused for a pending check.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        match self.run.state {
            TimerState::Running => self.tick_running(now),
            TimerState::Paused if self.run.activity_check_pending => {
                if self.monitor.poll(now) == ActivityStatus::AbortDue {
                    self.auto_abort(now)
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn tick_running(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        match self.run.kind {
            SessionKind::Focus => {
                let profile = self.profile();
                if profile.is_fixed() {
                    self.run.remaining_secs = self.run.remaining_secs.saturating_sub(1);
                }
                self.run.elapsed_focus_secs += 1;
                for award in accrue(&profile, self.run.elapsed_focus_secs, &mut self.run.tally) {
                    self.outbox.push(AwardIntent::Points {
                        amount: award.amount,
                        kind: award.kind,
                        note: format!("focus minute {}", award.minute),
                    });
                    events.push(Event::PointsAwarded {
                        amount: award.amount,
                        kind: award.kind,
                        minute: award.minute,
                        at: now,
                    });
                }
                if profile.is_fixed() && self.run.remaining_secs == 0 {
                    self.complete_focus(now, &mut events);
                } else if self.monitor.poll(now) == ActivityStatus::CheckDue {
                    self.raise_activity_check(now, &mut events);
                }
            }
            SessionKind::Break => {
                self.run.remaining_secs = self.run.remaining_secs.saturating_sub(1);
                if self.run.remaining_secs == 0 {
                    self.run.state = TimerState::Idle;
                    self.run.kind = SessionKind::Focus;
                    self.run.remaining_secs = self.profile().focus_secs;
                    events.push(Event::BreakFinished { at: now });
                }
            }
        }
        events
    }

    /// A fixed-duration focus interval reached zero: award the completion
    /// bonus, flush study minutes to the profile, and auto-advance into the
    /// break.
    fn complete_focus(&mut self, now: DateTime<Utc>, events: &mut Vec<Event>) {
        let profile = self.profile();
        self.run.state = TimerState::Completed;
        self.run.sessions_completed += 1;

        if profile.completion_bonus > 0 {
            self.outbox.push(AwardIntent::Points {
                amount: profile.completion_bonus,
                kind: AwardKind::SessionComplete,
                note: format!("{} session complete", self.run.mode.as_str()),
            });
            events.push(Event::PointsAwarded {
                amount: profile.completion_bonus,
                kind: AwardKind::SessionComplete,
                minute: self.run.elapsed_focus_secs / 60,
                at: now,
            });
        }
        let minutes = profile.focus_min() as u32;
        if minutes > 0 {
            self.outbox.push(AwardIntent::StudyMinutes { minutes });
        }
        events.push(Event::FocusCompleted {
            mode: self.run.mode,
            sessions_completed: self.run.sessions_completed,
            at: now,
        });
        tracing::debug!(
            mode = self.run.mode.as_str(),
            sessions = self.run.sessions_completed,
            "focus interval completed"
        );

        self.run.kind = SessionKind::Break;
        self.run.remaining_secs = profile.break_secs;
        self.run.state = TimerState::Running;
        events.push(Event::BreakStarted {
            remaining_secs: self.run.remaining_secs,
            at: now,
        });
    }

    fn raise_activity_check(&mut self, now: DateTime<Utc>, events: &mut Vec<Event>) {
        let deadline = self.monitor.raise(now);
        self.run.activity_check_pending = true;
        self.run.state = TimerState::Paused;
        tracing::debug!(%deadline, "activity check raised");
        events.push(Event::ActivityCheckRaised { deadline, at: now });
        events.push(Event::SessionPaused {
            remaining_secs: self.run.remaining_secs,
            elapsed_focus_secs: self.run.elapsed_focus_secs,
            at: now,
        });
    }

    /// The auto-abort deadline passed: discard the run. Granted points
    /// stay granted; only the unsaved session record is lost.
    fn auto_abort(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        let elapsed = self.run.elapsed_focus_secs;
        self.monitor.disarm();
        self.awaiting_save = false;
        self.run = FocusSessionRun::fresh(self.run.mode);
        self.run.remaining_secs = self.profile().focus_secs;
        tracing::debug!(elapsed_focus_secs = elapsed, "session auto-aborted for inactivity");
        vec![Event::SessionAutoAborted {
            elapsed_focus_secs: elapsed,
            at: now,
        }]
    }
}
