//! # Studyloop Core Library
//!
//! This library provides the core business logic for Studyloop's timed-study
//! ("Pomodoro") engine. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI being
//! a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Focus Engine**: A caller-driven state machine -- the host invokes
//!   `tick()` once per wall-clock second; the engine never spawns threads
//!   or internal timers
//! - **Point Accrual**: Converts elapsed focus time into per-minute and
//!   milestone point awards, queued as intents and drained explicitly
//! - **Activity Verification**: Periodic presence checks with an auto-abort
//!   grace window for unattended sessions
//! - **Storage**: SQLite-based ledger/profile/session persistence and
//!   TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusEngine`]: Core session state machine
//! - [`ActivityMonitor`]: Presence-check clock
//! - [`Database`]: Ledger, profile, and saved-session persistence
//! - [`Config`]: Application configuration management

pub mod collab;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;

pub use collab::{Ledger, ProfileStore, SessionStore};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use session::{
    ActivityMonitor, AwardIntent, AwardKind, AwardOutbox, FocusEngine, FocusSessionRun,
    ModeCatalog, ModeProfile, SavedSessionRecord, SessionKind, SessionMode, TimerState,
    VisibilityBridge,
};
pub use storage::{Config, Database, Stats};
