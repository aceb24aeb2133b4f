//! High-level store API: lifecycle mutations over the task table.

use crate::normalize::{DEFAULT_MAX_LENGTH, normalize};
use crate::storage::{self, Storage};
use crate::types::{Action, Outcome};
use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Row-level transition applied to a located pending task.
type Transition = fn(&Connection, i64, DateTime<Utc>) -> rusqlite::Result<usize>;

/// Default time to wait for another writer's lock, in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Infrastructure failures surfaced by the store.
///
/// Expected negative outcomes are never reported through this type; see
/// [`Outcome`].
#[derive(Debug)]
pub enum StoreError {
    /// The database could not be opened, configured, or initialized.
    Connection { path: PathBuf, reason: String },
    /// The store was used after `close()`.
    Closed,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Connection { path, reason } => {
                write!(f, "failed to open task database {}: {}", path.display(), reason)
            }
            StoreError::Closed => write!(f, "task store is closed"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database file path
    pub path: PathBuf,

    /// Maximum stored task length, in characters
    pub max_length: usize,

    /// How long to wait on another connection's write lock
    pub busy_timeout: Duration,
}

impl StoreConfig {
    /// Create config with default settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_length: DEFAULT_MAX_LENGTH,
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    /// Set the maximum task length.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Set the busy timeout.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

/// The task store. Owns exactly one connection for its lifetime.
pub struct Store {
    storage: Storage,
    max_length: usize,
}

impl Store {
    /// Open the store at `path` with default settings, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(StoreConfig::new(path.as_ref()))
    }

    /// Open the store described by `config`.
    pub fn open_with(config: StoreConfig) -> Result<Self> {
        let storage = Storage::open(&config.path, config.busy_timeout)?;
        Ok(Self {
            storage,
            max_length: config.max_length,
        })
    }

    /// Release the connection. Calling it again is a no-op.
    pub fn close(&mut self) -> Result<()> {
        self.storage.close()
    }

    /// Whether the store still holds its connection.
    pub fn is_open(&self) -> bool {
        self.storage.is_open()
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Maximum stored task length, in characters.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub(crate) fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Add a new pending task. Duplicate text is allowed.
    pub fn add(&mut self, text: &str) -> Result<Outcome> {
        let text = normalize(text, self.max_length);
        if text.is_empty() {
            log::debug!("add: rejected empty task");
            return Ok(Outcome::EmptyTask);
        }

        let tx = self.storage.begin_write()?;
        let id = storage::insert_task(&tx, &text, Utc::now()).context("Failed to insert task")?;
        tx.commit().context("Failed to commit add")?;

        log::debug!("add: id={} text={:?}", id, text);
        Ok(Outcome::Applied {
            action: Action::Add,
            id,
            text,
        })
    }

    /// Mark the earliest pending task with this text as completed.
    pub fn complete(&mut self, text: &str) -> Result<Outcome> {
        self.apply_to_oldest_pending(text, Action::Complete, storage::mark_completed)
    }

    /// Soft-delete the earliest pending task with this text.
    pub fn remove(&mut self, text: &str) -> Result<Outcome> {
        self.apply_to_oldest_pending(text, Action::Remove, storage::mark_deleted)
    }

    /// Permanently delete the earliest pending task with this text.
    pub fn delete(&mut self, text: &str) -> Result<Outcome> {
        self.apply_to_oldest_pending(text, Action::Delete, |db, id, _| storage::delete_task(db, id))
    }

    fn apply_to_oldest_pending(&mut self, text: &str, action: Action, transition: Transition) -> Result<Outcome> {
        let text = normalize(text, self.max_length);

        let tx = self.storage.begin_write()?;
        let Some(id) = storage::find_oldest_pending(&tx, &text).context("Failed to look up pending task")? else {
            log::debug!("{:?}: no pending task {:?}", action, text);
            return Ok(Outcome::NotFound { action, text });
        };

        transition(&tx, id, Utc::now()).with_context(|| format!("Failed to apply {:?} to task {}", action, id))?;
        tx.commit().context("Failed to commit lifecycle change")?;

        log::debug!("{:?}: id={} text={:?}", action, id, text);
        Ok(Outcome::Applied { action, id, text })
    }

    /// Soft-delete every visible task and return how many were affected.
    pub fn clear(&mut self) -> Result<usize> {
        let tx = self.storage.begin_write()?;
        let count = storage::mark_all_deleted(&tx, Utc::now()).context("Failed to clear tasks")?;
        tx.commit().context("Failed to commit clear")?;

        log::info!("Cleared {} task(s)", count);
        Ok(count)
    }

    /// Permanently delete every row, soft-deleted ones included.
    ///
    /// Does nothing and returns 0 unless `confirm` is set. With `compact`, the
    /// file is vacuumed after the delete commits.
    pub fn purge(&mut self, confirm: bool, compact: bool) -> Result<usize> {
        if !confirm {
            log::debug!("purge: not confirmed, skipping");
            return Ok(0);
        }

        let tx = self.storage.begin_write()?;
        let count = storage::delete_all(&tx).context("Failed to purge tasks")?;
        tx.commit().context("Failed to commit purge")?;
        log::info!("Purged {} task(s)", count);

        if compact {
            let result = self.vacuum()?;
            log::info!(
                "Compacted after purge: {} -> {} pages",
                result.page_count_before,
                result.page_count_after
            );
        }

        Ok(count)
    }
}
