use std::sync::{Arc, Mutex, PoisonError};

/// A shared, ordered log of calls made against the fakes.
///
/// Attaching one journal to both a [`MockChain`](super::MockChain) and a
/// [`MemoryIndex`](super::MemoryIndex) records the interleaving of node reads
/// and index writes.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    /// Appends an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).push(entry.into());
    }

    /// Returns a snapshot of all entries.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns the position of the first entry equal to `entry`.
    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }
}
