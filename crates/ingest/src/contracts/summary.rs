use super::Window;
use derive_more::Display;

/// Totals of a finished contract pass.
#[derive(Debug, Display, Clone, Default, PartialEq, Eq)]
#[display(
    "processed through block {}, {windows} windows, {found} found, {written} written, {skipped} skipped",
    through.map_or_else(|| "none".to_string(), |n| n.to_string())
)]
pub struct PassSummary {
    /// Last block of the last completed window.
    pub through: Option<u64>,
    /// Windows completed.
    pub windows: u64,
    /// Documents matched by the window searches.
    pub found: u64,
    /// Documents written or deleted.
    pub written: u64,
    /// Documents left untouched after a per-item failure.
    pub skipped: u64,
}

impl PassSummary {
    /// Folds a completed window into the totals.
    pub(crate) fn record(&mut self, window: Window, found: u64, written: u64, skipped: u64) {
        self.through = Some(window.last());
        self.windows += 1;
        self.found += found;
        self.written += written;
        self.skipped += skipped;
    }
}
