//! Journal service — timestamps entries and guards the ring buffer.

use std::sync::{Mutex, MutexGuard, PoisonError};

use acctl_domain::journal::Journal;
use acctl_domain::time::journal_prefix;

use crate::ports::TimeSource;

/// Shared, timestamped operational journal.
///
/// Every entry is prefixed with the local time when the clock is
/// synchronized, or with [`UNSYNCHRONIZED_MARKER`] otherwise, and mirrored
/// to the `tracing` log.
///
/// [`UNSYNCHRONIZED_MARKER`]: acctl_domain::time::UNSYNCHRONIZED_MARKER
pub struct JournalService<T> {
    clock: T,
    journal: Mutex<Journal>,
}

impl<T: TimeSource> JournalService<T> {
    /// Create a journal holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(clock: T, capacity: usize) -> Self {
        Self {
            clock,
            journal: Mutex::new(Journal::with_capacity(capacity)),
        }
    }

    /// Append a timestamped entry.
    pub fn append(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(target: "acctl::journal", "{message}");
        let entry = format!("{} {message}", journal_prefix(self.clock.now()));
        self.lock().append(entry);
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn read_all(&self) -> Vec<String> {
        self.lock().read_all()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
