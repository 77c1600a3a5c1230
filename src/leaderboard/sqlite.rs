use std::{fs, path::Path};

use rusqlite::{params, Connection};

use super::{ScoreEntry, ScoreTable};

/// SQLite-backed score table. The autoincrement `id` records arrival order
/// and breaks ties between equal scores.
pub struct SqliteTable {
    conn: Connection,
}

impl SqliteTable {
    pub fn open(db_path: &Path) -> Result<Self, String> {
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| format!("failed to create data dir {}: {e}", dir.display()))?;
        }
        let conn = Connection::open(db_path)
            .map_err(|e| format!("failed to open SQLite at {}: {e}", db_path.display()))?;
        conn.execute_batch("PRAGMA busy_timeout=5000;")
            .map_err(|e| format!("failed to set pragmas: {e}"))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("failed to open in-memory SQLite: {e}"))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, String> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS scores (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL,
                score       INTEGER NOT NULL
             );
             CREATE INDEX IF NOT EXISTS idx_scores_score ON scores(score DESC, id ASC);",
        )
        .map_err(|e| format!("failed to create schema: {e}"))?;
        Ok(Self { conn })
    }
}

impl ScoreTable for SqliteTable {
    fn insert(&mut self, entry: &ScoreEntry) -> Result<(), String> {
        self.conn
            .execute(
                "INSERT INTO scores (username, score) VALUES (?1, ?2)",
                params![entry.username, entry.score],
            )
            .map_err(|e| format!("insert score failed: {e}"))?;
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT username, score FROM scores
                 ORDER BY score DESC, id ASC
                 LIMIT ?1",
            )
            .map_err(|e| format!("prepare ranking query failed: {e}"))?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ScoreEntry {
                    username: row.get(0)?,
                    score: row.get(1)?,
                })
            })
            .map_err(|e| format!("ranking query failed: {e}"))?;
        let entries = rows
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("read ranking row failed: {e}"))?;
        Ok(entries)
    }
}
