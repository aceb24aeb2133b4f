//! Input normalization for task text.

/// Default upper bound on stored task text, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 100;

/// Trim surrounding whitespace and keep at most `max_length` characters.
///
/// Truncation counts characters, not bytes, so multi-byte text is never split
/// mid-character. The result may be empty.
pub fn normalize(text: &str, max_length: usize) -> String {
    text.trim().chars().take(max_length).collect()
}
