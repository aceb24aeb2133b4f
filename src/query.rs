//! Read-only projections over the task table.

use crate::storage::Storage;
use crate::store::Store;
use crate::types::{MatchMode, Task, TaskCounts};
use chrono::{DateTime, Utc};
use eyre::Result;

/// Keyword search builder.
///
/// Defaults to the case-insensitive `LIKE` dialect with the keyword wrapped as
/// a substring pattern.
///
/// ```ignore
/// let hits = store.search("Note_").surround_wildcards(false).execute()?;
/// let cats = store.search("Cat*").case_sensitive(true).surround_wildcards(false).execute()?;
/// ```
pub struct Search<'a> {
    storage: &'a Storage,
    keyword: String,
    mode: MatchMode,
    surround_wildcards: bool,
}

impl<'a> Search<'a> {
    pub(crate) fn new(storage: &'a Storage, keyword: impl Into<String>) -> Self {
        Self {
            storage,
            keyword: keyword.into(),
            mode: MatchMode::default(),
            surround_wildcards: true,
        }
    }

    /// Choose the dialect by case sensitivity (`true` selects `GLOB`).
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.mode = MatchMode::from_case_sensitive(case_sensitive);
        self
    }

    /// Choose the dialect explicitly.
    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Wrap the keyword in any-run wildcards (default), or use it verbatim.
    pub fn surround_wildcards(mut self, surround: bool) -> Self {
        self.surround_wildcards = surround;
        self
    }

    /// The pattern that will be handed to SQLite.
    pub fn pattern(&self) -> String {
        self.mode.pattern(&self.keyword, self.surround_wildcards)
    }

    /// Run the search and return matching texts in creation order.
    pub fn execute(self) -> Result<Vec<String>> {
        let pattern = self.pattern();
        log::debug!("search: {} {:?}", self.mode.operator(), pattern);
        self.storage.search_texts(&pattern, self.mode)
    }
}

/// Extension trait adding the read side to Store.
pub trait StoreQueryExt {
    /// Pending task texts, oldest first.
    fn list_pending(&self) -> Result<Vec<String>>;

    /// Completed task texts, oldest first.
    fn list_completed(&self) -> Result<Vec<String>>;

    /// `(text, created_at)` for every task in id order.
    fn list_all(&self, include_deleted: bool) -> Result<Vec<(String, DateTime<Utc>)>>;

    /// Full task records in id order.
    fn tasks(&self, include_deleted: bool) -> Result<Vec<Task>>;

    /// Start a keyword search.
    fn search(&self, keyword: impl Into<String>) -> Search<'_>;

    /// Pending, completed and soft-deleted counts.
    fn counts(&self) -> Result<TaskCounts>;
}

impl StoreQueryExt for Store {
    fn list_pending(&self) -> Result<Vec<String>> {
        self.storage().texts_by_status(false)
    }

    fn list_completed(&self) -> Result<Vec<String>> {
        self.storage().texts_by_status(true)
    }

    fn list_all(&self, include_deleted: bool) -> Result<Vec<(String, DateTime<Utc>)>> {
        Ok(self
            .tasks(include_deleted)?
            .into_iter()
            .map(|task| (task.text, task.created_at))
            .collect())
    }

    fn tasks(&self, include_deleted: bool) -> Result<Vec<Task>> {
        self.storage().list_tasks(include_deleted)
    }

    fn search(&self, keyword: impl Into<String>) -> Search<'_> {
        Search::new(self.storage(), keyword)
    }

    fn counts(&self) -> Result<TaskCounts> {
        self.storage().counts()
    }
}
