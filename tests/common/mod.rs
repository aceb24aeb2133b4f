//! Shared test infrastructure for tasklist integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use std::path::PathBuf;
use tasklist::{Outcome, Store, StoreConfig, StoreQueryExt};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: Store,
}

impl TestEnv {
    /// Create a new test environment with a fresh store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Store::open(temp_dir.path().join("tasks.db")).expect("Failed to open store");
        Self { temp_dir, store }
    }

    /// Create a new test environment with a custom max length.
    pub fn with_max_length(max_length: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = StoreConfig::new(temp_dir.path().join("tasks.db")).max_length(max_length);
        let store = Store::open_with(config).expect("Failed to open store");
        Self { temp_dir, store }
    }

    /// Path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("tasks.db")
    }

    /// Open a second store over the same file.
    pub fn reopen(&self) -> Store {
        Store::open(self.db_path()).expect("Failed to reopen store")
    }

    /// Add several tasks, asserting each was stored.
    pub fn add_all(&mut self, texts: &[&str]) {
        for text in texts {
            let outcome = self.store.add(text).expect("Failed to add task");
            assert!(outcome.is_applied(), "Expected {:?} to be added, got {:?}", text, outcome);
        }
    }

    /// Add a task and return the outcome.
    pub fn add(&mut self, text: &str) -> Outcome {
        self.store.add(text).expect("Failed to add task")
    }

    pub fn pending(&self) -> Vec<String> {
        self.store.list_pending().expect("Failed to list pending tasks")
    }

    pub fn completed(&self) -> Vec<String> {
        self.store.list_completed().expect("Failed to list completed tasks")
    }

    /// Texts from list_all.
    pub fn all_texts(&self, include_deleted: bool) -> Vec<String> {
        self.store
            .list_all(include_deleted)
            .expect("Failed to list tasks")
            .into_iter()
            .map(|(text, _)| text)
            .collect()
    }

    /// Run a search with explicit options.
    pub fn search(&self, keyword: &str, case_sensitive: bool, surround_wildcards: bool) -> Vec<String> {
        self.store
            .search(keyword)
            .case_sensitive(case_sensitive)
            .surround_wildcards(surround_wildcards)
            .execute()
            .expect("Failed to search")
    }

    /// Count occurrences of `text` among pending tasks.
    pub fn pending_count_of(&self, text: &str) -> usize {
        self.pending().iter().filter(|t| t.as_str() == text).count()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
