//! Core data types for the task list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single task record as persisted in the `tasks` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Monotonically assigned row id, never reused
    pub id: i64,

    /// Normalized task text
    pub text: String,

    /// Whether the task has been completed
    pub completed: bool,

    /// When inserted
    pub created_at: DateTime<Utc>,

    /// When completed (if completed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// When soft-deleted (if soft-deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Lifecycle state derived from the completion and deletion markers.
    pub fn state(&self) -> TaskState {
        if self.deleted_at.is_some() {
            TaskState::Deleted
        } else if self.completed {
            TaskState::Completed
        } else {
            TaskState::Pending
        }
    }
}

/// Visible lifecycle states of a stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Completed,
    Deleted,
}

/// Lifecycle mutation that produced an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Complete,
    Remove,
    Delete,
}

/// Informational result of a lifecycle mutation.
///
/// Expected negative outcomes ("nothing to do") are values here, never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was applied to the task with this id.
    Applied { action: Action, id: i64, text: String },

    /// The text normalized to nothing; no write happened.
    EmptyTask,

    /// No pending task matched the normalized text.
    NotFound { action: Action, text: String },
}

impl Outcome {
    /// True when the store was mutated.
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    /// Id of the affected task, if any.
    pub fn id(&self) -> Option<i64> {
        match self {
            Outcome::Applied { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Applied { action, text, .. } => match action {
                Action::Add => write!(f, "Task \"{}\" added.", text),
                Action::Complete => write!(f, "Task \"{}\" marked as completed.", text),
                Action::Remove => write!(f, "Task \"{}\" removed.", text),
                Action::Delete => write!(f, "Task \"{}\" deleted.", text),
            },
            Outcome::EmptyTask => write!(f, "Cannot add an empty task."),
            Outcome::NotFound { action, .. } => match action {
                Action::Add => write!(f, "No pending task found."),
                Action::Complete => write!(f, "No pending task found to complete."),
                Action::Remove => write!(f, "No pending task found to remove."),
                Action::Delete => write!(f, "No pending task found to delete."),
            },
        }
    }
}

/// Wildcard dialect used by keyword search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// SQL `LIKE`: `%` matches any run, `_` one character, ASCII case-insensitive.
    #[default]
    Like,

    /// SQL `GLOB`: `*`, `?` and `[...]` classes, case-sensitive, unescaped.
    Glob,
}

impl MatchMode {
    /// Pick the dialect that implements the requested case sensitivity.
    pub fn from_case_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive { MatchMode::Glob } else { MatchMode::Like }
    }

    /// SQL operator for this dialect.
    pub fn operator(&self) -> &'static str {
        match self {
            MatchMode::Like => "LIKE",
            MatchMode::Glob => "GLOB",
        }
    }

    /// Wildcard matching any run of characters.
    pub fn any_run(&self) -> char {
        match self {
            MatchMode::Like => '%',
            MatchMode::Glob => '*',
        }
    }

    /// Build the full pattern for `keyword`, optionally as a substring match.
    pub fn pattern(&self, keyword: &str, surround_wildcards: bool) -> String {
        if surround_wildcards {
            let any = self.any_run();
            format!("{any}{keyword}{any}")
        } else {
            keyword.to_string()
        }
    }
}

/// Per-state record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub pending: usize,
    pub completed: usize,
    pub deleted: usize,
}

impl fmt::Display for TaskCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TaskList pending={} completed={}>", self.pending, self.completed)
    }
}
