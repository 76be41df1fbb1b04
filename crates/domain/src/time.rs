//! Time and timestamp helpers.

use chrono::NaiveDateTime;

/// Local wall-clock time as reported by a synchronized time source.
pub type LocalTime = NaiveDateTime;

/// Prefix used for journal entries written before the clock is synchronized.
pub const UNSYNCHRONIZED_MARKER: &str = "[--:--:--]";

/// Render the journal prefix for an optional local time.
#[must_use]
pub fn journal_prefix(now: Option<LocalTime>) -> String {
    match now {
        Some(now) => now.format("[%Y-%m-%d %H:%M:%S]").to_string(),
        None => UNSYNCHRONIZED_MARKER.to_string(),
    }
}
