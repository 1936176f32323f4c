//! Session mode catalog.
//!
//! Static table of session modes and their durations and bonus rules.
//! Profiles are fixed at process start (optionally overridden once from
//! configuration) and immutable for the lifetime of a run.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Short,
    Long,
    /// Open-ended focus with milestone bonuses instead of a completion bonus.
    Infinite,
}

impl SessionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Short => "short",
            SessionMode::Long => "long",
            SessionMode::Infinite => "infinite",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "short" => Some(SessionMode::Short),
            "long" => Some(SessionMode::Long),
            "infinite" => Some(SessionMode::Infinite),
            _ => None,
        }
    }

    /// Built-in profile for this mode.
    pub fn profile(self) -> ModeProfile {
        match self {
            SessionMode::Short => ModeProfile {
                mode: self,
                focus_secs: 25 * 60,
                break_secs: 5 * 60,
                completion_bonus: 200,
                milestone_bonus: 0,
                milestone_interval_min: MILESTONE_INTERVAL_MIN,
            },
            SessionMode::Long => ModeProfile {
                mode: self,
                focus_secs: 50 * 60,
                break_secs: 10 * 60,
                completion_bonus: 500,
                milestone_bonus: 0,
                milestone_interval_min: MILESTONE_INTERVAL_MIN,
            },
            SessionMode::Infinite => ModeProfile {
                mode: self,
                focus_secs: 0,
                break_secs: 0,
                completion_bonus: 0,
                milestone_bonus: 100,
                milestone_interval_min: MILESTONE_INTERVAL_MIN,
            },
        }
    }
}

/// Milestone cadence for open-ended sessions, in elapsed focus minutes.
pub const MILESTONE_INTERVAL_MIN: u64 = 30;

/// Durations and bonus rules for one session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeProfile {
    pub mode: SessionMode,
    /// Focus interval length in seconds (0 for infinite).
    pub focus_secs: u64,
    /// Break interval length in seconds (0 for infinite).
    pub break_secs: u64,
    /// Awarded once when a fixed-duration focus interval reaches zero.
    pub completion_bonus: u32,
    /// Awarded per milestone interval; only nonzero for infinite mode.
    pub milestone_bonus: u32,
    pub milestone_interval_min: u64,
}

impl ModeProfile {
    /// Fixed-duration modes count down; infinite counts up without bound.
    pub fn is_fixed(&self) -> bool {
        self.focus_secs > 0
    }

    pub fn focus_min(&self) -> u64 {
        self.focus_secs / 60
    }
}

/// Profile table for every mode, fixed at engine construction.
///
/// Defaults to the built-in catalog; configuration may substitute adjusted
/// profiles once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeCatalog {
    pub short: ModeProfile,
    pub long: ModeProfile,
    pub infinite: ModeProfile,
}

impl Default for ModeCatalog {
    fn default() -> Self {
        Self {
            short: SessionMode::Short.profile(),
            long: SessionMode::Long.profile(),
            infinite: SessionMode::Infinite.profile(),
        }
    }
}

impl ModeCatalog {
    /// Pure lookup; every mode has exactly one profile.
    pub fn get(&self, mode: SessionMode) -> ModeProfile {
        match mode {
            SessionMode::Short => self.short,
            SessionMode::Long => self.long,
            SessionMode::Infinite => self.infinite,
        }
    }
}
