//! Journal — a bounded ring of operational log lines.
//!
//! Once the ring is full, each append silently evicts the oldest entry.
//! Entries are only ever removed in bulk by [`Journal::clear`].

/// Default number of entries kept.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 300;

/// Fixed-capacity circular buffer of text entries.
#[derive(Debug, Clone)]
pub struct Journal {
    entries: Vec<String>,
    capacity: usize,
    cursor: usize,
    count: usize,
}

impl Journal {
    /// Create an empty journal holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "journal capacity must be non-zero");
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
            count: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Write `entry` at the cursor, overwriting the oldest entry when full.
    pub fn append(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        if self.cursor < self.entries.len() {
            self.entries[self.cursor] = entry;
        } else {
            self.entries.push(entry);
        }
        self.cursor = (self.cursor + 1) % self.capacity;
        self.count = (self.count + 1).min(self.capacity);
    }

    /// All live entries, oldest first.
    #[must_use]
    pub fn read_all(&self) -> Vec<String> {
        // Before the first wrap the oldest entry is at 0; afterwards it is
        // the slot the cursor is about to overwrite.
        let start = if self.count < self.capacity {
            0
        } else {
            self.cursor
        };
        (0..self.count)
            .map(|offset| self.entries[(start + offset) % self.capacity].clone())
            .collect()
    }

    /// Forget every entry. Slots are overwritten lazily by later appends.
    pub fn clear(&mut self) {
        self.cursor = 0;
        self.count = 0;
    }
}

impl Default for Journal {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_JOURNAL_CAPACITY)
    }
}
