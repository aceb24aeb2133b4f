//! Storage layer: owns the SQLite connection and the `tasks` table.

use crate::store::StoreError;
use crate::types::{MatchMode, Task, TaskCounts};
use chrono::{DateTime, SecondsFormat, Utc};
use eyre::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Columns of a full task row, in `row_to_task` order.
const TASK_COLUMNS: &str = "id, text, completed, created_at, completed_at, deleted_at";

/// Storage handle for a single task database file.
pub struct Storage {
    path: PathBuf,
    db: Option<Connection>,
}

impl Storage {
    /// Open (or create) the database at `path`.
    ///
    /// Any failure while connecting, configuring the journal, or creating the
    /// schema is reported as [`StoreError::Connection`].
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let db = Self::connect(path, busy_timeout).map_err(|e| {
            eyre::eyre!(StoreError::Connection {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        })?;

        log::info!("Opened task database at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            db: Some(db),
        })
    }

    fn connect(path: &Path, busy_timeout: Duration) -> rusqlite::Result<Connection> {
        let db = Connection::open(path)?;
        db.busy_timeout(busy_timeout)?;

        // In-memory databases report "memory" here; both are fine.
        let mode: String = db.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        log::debug!("journal_mode={}", mode);

        Self::init_schema(&db)?;
        Ok(db)
    }

    /// Initialize SQLite schema.
    fn init_schema(db: &Connection) -> rusqlite::Result<()> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0 CHECK (completed IN (0, 1)),
                created_at TEXT NOT NULL,
                completed_at TEXT,
                deleted_at TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_lookup ON tasks(text, completed, deleted_at);
            CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at);
            "#,
        )
    }

    /// Path the database was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the connection is still held.
    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Release the connection. Safe to call more than once.
    pub fn close(&mut self) -> Result<()> {
        let Some(db) = self.db.take() else {
            return Ok(());
        };

        // On failure the connection handed back is dropped here, which still
        // releases it; the handle is gone either way.
        db.close()
            .map_err(|(_, e)| e)
            .context("Failed to close SQLite database")?;

        log::info!("Closed task database at {}", self.path.display());
        Ok(())
    }

    fn db(&self) -> Result<&Connection> {
        self.db.as_ref().ok_or_else(|| eyre::eyre!(StoreError::Closed))
    }

    /// Start a write transaction, taking the write lock up front.
    pub fn begin_write(&mut self) -> Result<Transaction<'_>> {
        let db = self.db.as_mut().ok_or_else(|| eyre::eyre!(StoreError::Closed))?;
        db.transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to begin write transaction")
    }

    /// Pending task texts (`completed = false`) or completed ones, creation order.
    pub fn texts_by_status(&self, completed: bool) -> Result<Vec<String>> {
        let mut stmt = self.db()?.prepare(
            r#"
            SELECT text FROM tasks
            WHERE completed = ? AND deleted_at IS NULL
            ORDER BY created_at ASC, id ASC
            "#,
        )?;

        let texts = stmt
            .query_map(params![completed], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(texts)
    }

    /// Full task rows ordered by id.
    pub fn list_tasks(&self, include_deleted: bool) -> Result<Vec<Task>> {
        let sql = if include_deleted {
            format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id ASC")
        } else {
            format!("SELECT {TASK_COLUMNS} FROM tasks WHERE deleted_at IS NULL ORDER BY id ASC")
        };

        let mut stmt = self.db()?.prepare(&sql)?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<rusqlite::Result<Vec<Task>>>()?;

        Ok(tasks)
    }

    /// Visible task texts matching `pattern` under `mode`, creation order.
    pub fn search_texts(&self, pattern: &str, mode: MatchMode) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT text FROM tasks WHERE deleted_at IS NULL AND text {} ? ORDER BY created_at ASC, id ASC",
            mode.operator()
        );

        let mut stmt = self.db()?.prepare(&sql)?;
        let texts = stmt
            .query_map(params![pattern], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(texts)
    }

    /// Count rows per lifecycle state.
    pub fn counts(&self) -> Result<TaskCounts> {
        let counts = self.db()?.query_row(
            r#"
            SELECT
                COALESCE(SUM(deleted_at IS NULL AND completed = 0), 0),
                COALESCE(SUM(deleted_at IS NULL AND completed = 1), 0),
                COALESCE(SUM(deleted_at IS NOT NULL), 0)
            FROM tasks
            "#,
            [],
            |row| {
                Ok(TaskCounts {
                    pending: row.get::<_, i64>(0)? as usize,
                    completed: row.get::<_, i64>(1)? as usize,
                    deleted: row.get::<_, i64>(2)? as usize,
                })
            },
        )?;

        Ok(counts)
    }

    /// Number of pages in the database.
    pub fn page_count(&self) -> Result<u64> {
        let pages: i64 = self.db()?.query_row("PRAGMA page_count", [], |row| row.get(0))?;
        Ok(pages as u64)
    }

    /// Number of unused pages on the freelist.
    pub fn freelist_count(&self) -> Result<u64> {
        let pages: i64 = self.db()?.query_row("PRAGMA freelist_count", [], |row| row.get(0))?;
        Ok(pages as u64)
    }

    /// Rebuild the database file and fold the WAL back into it.
    ///
    /// SQLite refuses to VACUUM inside a transaction.
    pub fn vacuum(&self) -> Result<()> {
        let db = self.db()?;
        if !db.is_autocommit() {
            eyre::bail!("cannot vacuum while a transaction is open");
        }

        db.execute_batch("VACUUM").context("VACUUM failed")?;
        db.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            .context("WAL checkpoint failed")?;

        Ok(())
    }
}

/// Insert a new pending task and return its id.
pub fn insert_task(db: &Connection, text: &str, now: DateTime<Utc>) -> rusqlite::Result<i64> {
    db.execute(
        "INSERT INTO tasks (text, completed, created_at) VALUES (?, 0, ?)",
        params![text, format_timestamp(now)],
    )?;
    Ok(db.last_insert_rowid())
}

/// Id of the earliest-created pending task with exactly this text.
pub fn find_oldest_pending(db: &Connection, text: &str) -> rusqlite::Result<Option<i64>> {
    db.query_row(
        r#"
        SELECT id FROM tasks
        WHERE text = ? AND completed = 0 AND deleted_at IS NULL
        ORDER BY created_at ASC, id ASC
        LIMIT 1
        "#,
        params![text],
        |row| row.get(0),
    )
    .optional()
}

pub fn mark_completed(db: &Connection, id: i64, now: DateTime<Utc>) -> rusqlite::Result<usize> {
    db.execute(
        "UPDATE tasks SET completed = 1, completed_at = ? WHERE id = ?",
        params![format_timestamp(now), id],
    )
}

pub fn mark_deleted(db: &Connection, id: i64, now: DateTime<Utc>) -> rusqlite::Result<usize> {
    db.execute(
        "UPDATE tasks SET deleted_at = ? WHERE id = ?",
        params![format_timestamp(now), id],
    )
}

pub fn delete_task(db: &Connection, id: i64) -> rusqlite::Result<usize> {
    db.execute("DELETE FROM tasks WHERE id = ?", params![id])
}

/// Soft-delete every visible row.
pub fn mark_all_deleted(db: &Connection, now: DateTime<Utc>) -> rusqlite::Result<usize> {
    db.execute(
        "UPDATE tasks SET deleted_at = ? WHERE deleted_at IS NULL",
        params![format_timestamp(now)],
    )
}

/// Physically remove every row, whatever its state.
pub fn delete_all(db: &Connection) -> rusqlite::Result<usize> {
    db.execute("DELETE FROM tasks", [])
}

/// Fixed-width RFC 3339 so that text order matches time order.
fn format_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Convert a database row to a Task.
fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    let created_at: String = row.get(3)?;
    let completed_at: Option<String> = row.get(4)?;
    let deleted_at: Option<String> = row.get(5)?;

    Ok(Task {
        id: row.get(0)?,
        text: row.get(1)?,
        completed: row.get(2)?,
        created_at: parse_timestamp(3, &created_at)?,
        completed_at: completed_at.map(|s| parse_timestamp(4, &s)).transpose()?,
        deleted_at: deleted_at.map(|s| parse_timestamp(5, &s)).transpose()?,
    })
}
