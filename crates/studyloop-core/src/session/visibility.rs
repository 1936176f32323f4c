//! Visibility bridge.
//!
//! Stateless observer: when the host loses foreground visibility while a
//! focus interval is running, it should surface a persistent floating timer
//! view. Regaining visibility does not dismiss the floating view -- that is
//! the caller's call. This component never reads or writes the run beyond
//! the engine's public queries.

use chrono::{DateTime, Utc};

use super::engine::{FocusEngine, SessionKind, TimerState};
use crate::events::Event;

#[derive(Debug, Clone, Copy, Default)]
pub struct VisibilityBridge;

impl VisibilityBridge {
    /// Host visibility changed. Returns a floating-timer request when the
    /// host went hidden mid-focus; everything else is ignored.
    pub fn observe(
        &self,
        visible: bool,
        engine: &FocusEngine,
        now: DateTime<Utc>,
    ) -> Option<Event> {
        if visible {
            return None;
        }
        if engine.state() != TimerState::Running || engine.kind() != SessionKind::Focus {
            return None;
        }
        Some(Event::FloatingTimerRequested {
            remaining_secs: engine.run().remaining_secs,
            elapsed_focus_secs: engine.run().elapsed_focus_secs,
            at: now,
        })
    }
}
