//! SQLite-based session history and statistics.
//!
//! Every finished timer run (completed or abandoned) can be recorded here.
//! Statistics aggregate by time range and by timer kind, the numbers the
//! stats surfaces display.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::HistoryError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub kind: String,
    pub name: String,
    pub category: String,
    pub duration_secs: u64,
    pub was_completed: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Per-kind aggregate inside [`SessionStats`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KindStat {
    pub sessions: u64,
    pub total_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_sessions: u64,
    pub completed_sessions: u64,
    pub abandoned_sessions: u64,
    pub total_secs: u64,
    /// The most-used timer kind in the range, if any sessions exist.
    pub favorite_kind: Option<String>,
    pub by_kind: BTreeMap<String, KindStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsRange {
    Today,
    Week,
    All,
}

impl StatsRange {
    fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            StatsRange::Today => Some(now - Duration::hours(24)),
            StatsRange::Week => Some(now - Duration::days(7)),
            StatsRange::All => None,
        }
    }
}

/// SQLite database for finished timer sessions.
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the database at `~/.config/tunggu/tunggu.db`.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, HistoryError> {
        let dir = data_dir().map_err(|e| HistoryError::DataDir(e.to_string()))?;
        let path = dir.join("tunggu.db");
        Self::open_at(&path).map_err(|source| HistoryError::OpenFailed { path, source })
    }

    /// Open at an explicit path; used by tests and TUNGGU_ENV overrides.
    pub fn open_at(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                kind          TEXT NOT NULL,
                name          TEXT NOT NULL DEFAULT '',
                category      TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                was_completed INTEGER NOT NULL,
                started_at    TEXT NOT NULL,
                finished_at   TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_finished_at ON sessions(finished_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_kind ON sessions(kind);",
        )?;
        Ok(())
    }

    /// Record a finished run.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    #[allow(clippy::too_many_arguments)]
    pub fn record_session(
        &self,
        kind: &str,
        name: &str,
        category: &str,
        duration_secs: u64,
        was_completed: bool,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Result<i64, rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO sessions (kind, name, category, duration_secs, was_completed, started_at, finished_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                kind,
                name,
                category,
                duration_secs,
                was_completed,
                started_at.to_rfc3339(),
                finished_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent sessions, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, name, category, duration_secs, was_completed, started_at, finished_at
             FROM sessions ORDER BY finished_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(SessionRecord {
                id: row.get(0)?,
                kind: row.get(1)?,
                name: row.get(2)?,
                category: row.get(3)?,
                duration_secs: row.get(4)?,
                was_completed: row.get(5)?,
                started_at: parse_ts(row.get::<_, String>(6)?),
                finished_at: parse_ts(row.get::<_, String>(7)?),
            })
        })?;
        rows.collect()
    }

    /// Delete all recorded sessions, returning how many were removed.
    pub fn clear(&self) -> Result<usize, rusqlite::Error> {
        self.conn.execute("DELETE FROM sessions", [])
    }

    /// Aggregate statistics over the given range.
    pub fn stats(&self, range: StatsRange) -> Result<SessionStats, rusqlite::Error> {
        let cutoff = range
            .cutoff(Utc::now())
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        let mut stmt = self.conn.prepare(
            "SELECT kind, was_completed, COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions
             WHERE finished_at >= ?1
             GROUP BY kind, was_completed",
        )?;

        let mut stats = SessionStats::default();
        let rows = stmt.query_map(params![cutoff], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, bool>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, u64>(3)?,
            ))
        })?;

        for row in rows {
            let (kind, was_completed, count, secs) = row?;
            stats.total_sessions += count;
            stats.total_secs += secs;
            if was_completed {
                stats.completed_sessions += count;
            } else {
                stats.abandoned_sessions += count;
            }
            let entry = stats.by_kind.entry(kind).or_default();
            entry.sessions += count;
            entry.total_secs += secs;
        }

        stats.favorite_kind = stats
            .by_kind
            .iter()
            .max_by_key(|(_, stat)| stat.sessions)
            .map(|(kind, _)| kind.clone());

        Ok(stats)
    }
}

fn parse_ts(raw: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_query_recent() {
        let db = HistoryDb::open_memory().unwrap();
        let now = Utc::now();
        db.record_session("pomodoro", "Pomodoro", "fitness", 1500, true, now, now)
            .unwrap();
        db.record_session("egg-timer", "Egg Timer", "kitchen", 480, false, now, now)
            .unwrap();

        let recent = db.recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(db.recent(1).unwrap().len(), 1);
    }

    #[test]
    fn stats_aggregate_by_kind_and_completion() {
        let db = HistoryDb::open_memory().unwrap();
        let now = Utc::now();
        for _ in 0..3 {
            db.record_session("pomodoro", "Pomodoro", "fitness", 1500, true, now, now)
                .unwrap();
        }
        db.record_session("hiit", "HIIT", "fitness", 230, false, now, now)
            .unwrap();

        let stats = db.stats(StatsRange::All).unwrap();
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.completed_sessions, 3);
        assert_eq!(stats.abandoned_sessions, 1);
        assert_eq!(stats.total_secs, 3 * 1500 + 230);
        assert_eq!(stats.favorite_kind.as_deref(), Some("pomodoro"));
        assert_eq!(stats.by_kind["pomodoro"].sessions, 3);
        assert_eq!(stats.by_kind["hiit"].total_secs, 230);
    }

    #[test]
    fn today_range_excludes_old_sessions() {
        let db = HistoryDb::open_memory().unwrap();
        let now = Utc::now();
        let last_month = now - Duration::days(30);
        db.record_session("tea-timer", "Tea", "kitchen", 240, true, last_month, last_month)
            .unwrap();
        db.record_session("tea-timer", "Tea", "kitchen", 240, true, now, now)
            .unwrap();

        let today = db.stats(StatsRange::Today).unwrap();
        assert_eq!(today.total_sessions, 1);
        let all = db.stats(StatsRange::All).unwrap();
        assert_eq!(all.total_sessions, 2);
    }

    #[test]
    fn clear_empties_history() {
        let db = HistoryDb::open_memory().unwrap();
        let now = Utc::now();
        db.record_session("pomodoro", "Pomodoro", "fitness", 1500, true, now, now)
            .unwrap();
        assert_eq!(db.clear().unwrap(), 1);
        assert!(db.recent(10).unwrap().is_empty());
        assert_eq!(db.stats(StatsRange::All).unwrap().total_sessions, 0);
    }
}
