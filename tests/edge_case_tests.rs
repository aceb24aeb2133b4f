//! Integration tests for edge cases.
//!
//! Tests boundary values, unicode handling, and unusual inputs.

mod common;

use common::TestEnv;
use tasklist::{DEFAULT_MAX_LENGTH, StoreQueryExt, TaskCounts};

// =============================================================================
// Empty Store Operations
// =============================================================================

#[test]
fn test_empty_store_lists() {
    let env = TestEnv::new();

    assert!(env.pending().is_empty());
    assert!(env.completed().is_empty());
    assert!(env.all_texts(false).is_empty());
    assert!(env.all_texts(true).is_empty());
    assert_eq!(env.store.counts().unwrap(), TaskCounts::default());
}

#[test]
fn test_empty_store_bulk_operations() {
    let mut env = TestEnv::new();

    assert_eq!(env.store.clear().unwrap(), 0);
    assert_eq!(env.store.purge(true, true).unwrap(), 0);
}

// =============================================================================
// Length bounds
// =============================================================================

#[test]
fn test_long_text_truncated_to_max_length() {
    let mut env = TestEnv::new();
    assert_eq!(env.store.max_length(), DEFAULT_MAX_LENGTH);

    let long = "a".repeat(DEFAULT_MAX_LENGTH + 50);
    let outcome = env.add(&long);
    assert!(outcome.to_string().starts_with("Task \""));

    let pending = env.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].chars().count(), DEFAULT_MAX_LENGTH);
}

#[test]
fn test_text_at_max_length_kept_whole() {
    let mut env = TestEnv::new();

    let exact = "b".repeat(DEFAULT_MAX_LENGTH);
    env.add(&exact);
    assert_eq!(env.pending(), vec![exact]);
}

#[test]
fn test_truncated_text_can_be_completed_by_original_input() {
    let mut env = TestEnv::with_max_length(10);

    env.add("Write the quarterly report");
    assert_eq!(env.pending(), vec!["Write the "]);

    let outcome = env.store.complete("Write the quarterly report").unwrap();
    assert!(outcome.is_applied());
    assert_eq!(env.completed(), vec!["Write the "]);
}

#[test]
fn test_zero_max_length_rejects_everything() {
    let mut env = TestEnv::with_max_length(0);

    assert!(!env.add("anything").is_applied());
    assert!(env.pending().is_empty());
}

// =============================================================================
// Unicode and Special Characters
// =============================================================================

#[test]
fn test_unicode_text() {
    let mut env = TestEnv::new();

    env.add_all(&[
        "Task with emoji: \u{1F680}",
        "\u{4E2D}\u{6587}\u{4EFB}\u{52A1}",
        "\u{0645}\u{0647}\u{0645}\u{0629}",
    ]);

    assert_eq!(
        env.pending(),
        vec![
            "Task with emoji: \u{1F680}",
            "\u{4E2D}\u{6587}\u{4EFB}\u{52A1}",
            "\u{0645}\u{0647}\u{0645}\u{0629}",
        ]
    );
}

#[test]
fn test_unicode_truncation_counts_characters() {
    let mut env = TestEnv::with_max_length(3);

    env.add("\u{1F680}\u{1F680}\u{1F680}\u{1F680}\u{1F680}");
    assert_eq!(env.pending(), vec!["\u{1F680}\u{1F680}\u{1F680}"]);
}

#[test]
fn test_sql_metacharacters_stored_verbatim() {
    let mut env = TestEnv::new();

    let tricky = "Robert'); DROP TABLE tasks;--";
    env.add(tricky);

    assert_eq!(env.pending(), vec![tricky]);
    assert!(env.store.complete(tricky).unwrap().is_applied());
}

#[test]
fn test_inner_whitespace_preserved() {
    let mut env = TestEnv::new();

    env.add("  two   spaces  ");
    assert_eq!(env.pending(), vec!["two   spaces"]);
}

#[test]
fn test_text_match_is_exact_not_case_folded() {
    let mut env = TestEnv::new();

    env.add("Call Mom");
    assert!(!env.store.complete("call mom").unwrap().is_applied());
    assert_eq!(env.pending(), vec!["Call Mom"]);
}

// =============================================================================
// Ordering and timestamps
// =============================================================================

#[test]
fn test_list_all_in_id_order_with_timestamps() {
    let mut env = TestEnv::new();

    env.add_all(&["First", "Second", "Third"]);
    env.store.complete("Second").unwrap();

    let all = env.store.list_all(false).unwrap();
    let texts: Vec<&str> = all.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(texts, vec!["First", "Second", "Third"]);
    assert!(all.windows(2).all(|w| w[0].1 <= w[1].1));
}

#[test]
fn test_many_duplicates_drain_in_order() {
    let mut env = TestEnv::new();

    let ids: Vec<i64> = (0..10).map(|_| env.add("Repeat").id().unwrap()).collect();

    for expected in &ids {
        let outcome = env.store.complete("Repeat").unwrap();
        assert_eq!(outcome.id(), Some(*expected));
    }
    assert!(!env.store.complete("Repeat").unwrap().is_applied());
    assert_eq!(env.completed().len(), 10);
}
