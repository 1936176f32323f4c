//! SQLite-based persistence.
//!
//! One database backs all three collaborator seams:
//! - `ledger`: point transactions (never reversed by the engine)
//! - `profile`: a single cumulative study-minute counter
//! - `saved_sessions`: records handed off when a run is saved
//! - `kv`: key-value store, used by the CLI to persist the engine

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::collab::{Ledger, ProfileStore, SessionStore};
use crate::error::{CoreError, DatabaseError};
use crate::session::{AwardKind, SavedSessionRecord, SessionMode};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_study_min: u64,
    pub total_points: u64,
    pub today_sessions: u64,
    pub today_points: u64,
}

/// SQLite database implementing the engine's collaborator seams.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/studyloop.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()
            .map_err(|e| CoreError::Custom(e.to_string()))?
            .join("studyloop.db");
        Self::open_at(&path)
    }

    /// Open a database at a specific path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory().map_err(DatabaseError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS saved_sessions (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    name          TEXT NOT NULL,
                    mode          TEXT NOT NULL,
                    duration_min  INTEGER NOT NULL,
                    points_earned INTEGER NOT NULL,
                    created_at    TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS ledger (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
                    amount     INTEGER NOT NULL,
                    kind       TEXT NOT NULL,
                    note       TEXT NOT NULL DEFAULT '',
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS profile (
                    id            INTEGER PRIMARY KEY CHECK (id = 1),
                    study_minutes INTEGER NOT NULL DEFAULT 0
                );
                INSERT OR IGNORE INTO profile (id, study_minutes) VALUES (1, 0);

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_sessions_created_at ON saved_sessions(created_at);
                CREATE INDEX IF NOT EXISTS idx_ledger_created_at ON ledger(created_at);
                CREATE INDEX IF NOT EXISTS idx_ledger_kind ON ledger(kind);",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// List saved sessions, newest first.
    pub fn list_sessions(&self) -> Result<Vec<SavedSessionRecord>, CoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, mode, duration_min, points_earned, created_at
             FROM saved_sessions
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, u64>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (name, mode, duration_min, points_earned, created_at) = row?;
            sessions.push(SavedSessionRecord {
                name,
                mode: SessionMode::from_str(&mode).unwrap_or(SessionMode::Short),
                duration_min,
                points_earned,
                created_at: created_at
                    .parse::<DateTime<Utc>>()
                    .unwrap_or_else(|_| Utc::now()),
            });
        }
        Ok(sessions)
    }

    pub fn stats_all(&self) -> Result<Stats, CoreError> {
        let midnight = format!("{}T00:00:00+00:00", Utc::now().format("%Y-%m-%d"));
        let total_sessions = self.conn.query_row(
            "SELECT COUNT(*) FROM saved_sessions",
            [],
            |row| row.get::<_, u64>(0),
        )?;
        let total_points = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM ledger",
            [],
            |row| row.get::<_, u64>(0),
        )?;
        let total_study_min = self.conn.query_row(
            "SELECT study_minutes FROM profile WHERE id = 1",
            [],
            |row| row.get::<_, u64>(0),
        )?;
        let (today_sessions, today_points) = {
            let sessions = self.conn.query_row(
                "SELECT COUNT(*) FROM saved_sessions WHERE created_at >= ?1",
                params![midnight],
                |row| row.get::<_, u64>(0),
            )?;
            let points = self.conn.query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM ledger WHERE created_at >= ?1",
                params![midnight],
                |row| row.get::<_, u64>(0),
            )?;
            (sessions, points)
        };
        Ok(Stats {
            total_sessions,
            total_study_min,
            total_points,
            today_sessions,
            today_points,
        })
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl Ledger for Database {
    fn award(&self, amount: u32, kind: AwardKind, note: &str) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT INTO ledger (amount, kind, note, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![amount, kind.as_str(), note, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl ProfileStore for Database {
    fn add_study_minutes(&self, minutes: u32) -> Result<(), CoreError> {
        self.conn.execute(
            "UPDATE profile SET study_minutes = study_minutes + ?1 WHERE id = 1",
            params![minutes],
        )?;
        Ok(())
    }
}

impl SessionStore for Database {
    fn next_sequential_name(&self) -> Result<String, CoreError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM saved_sessions",
            [],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(format!("Session {}", count + 1))
    }

    fn save(&self, record: &SavedSessionRecord) -> Result<(), CoreError> {
        self.conn.execute(
            "INSERT INTO saved_sessions (name, mode, duration_min, points_earned, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.name,
                record.mode.as_str(),
                record.duration_min,
                record.points_earned,
                record.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
