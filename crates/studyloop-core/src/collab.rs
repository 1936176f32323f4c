//! Collaborator traits consumed by the engine.
//!
//! The engine never talks to storage directly; it sees three narrow seams:
//! a ledger for point transactions, a profile store for cumulative study
//! minutes, and a session store for saved session records. The SQLite
//! [`Database`](crate::storage::Database) implements all three; tests use
//! in-memory recorders.

use crate::error::CoreError;
use crate::session::{AwardKind, SavedSessionRecord};

/// Records point transactions. Amounts are always positive here; other
/// parts of the wider system may deduct.
pub trait Ledger {
    fn award(&self, amount: u32, kind: AwardKind, note: &str) -> Result<(), CoreError>;
}

/// Accumulates total study minutes on the user profile.
pub trait ProfileStore {
    fn add_study_minutes(&self, minutes: u32) -> Result<(), CoreError>;
}

/// Persists saved session records.
pub trait SessionStore {
    /// Next sequential display label ("Session {count + 1}").
    ///
    /// Count-then-name is a convenience, not a uniqueness guarantee: two
    /// concurrent saves can compute the same label.
    fn next_sequential_name(&self) -> Result<String, CoreError>;

    fn save(&self, record: &SavedSessionRecord) -> Result<(), CoreError>;
}
