use chainscan_codec::ScaleConfig;
use chainscan_index::DEFAULT_SEARCH_SIZE;
use derive_more::Display;

/// Contract resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Blocks per window.
    pub batch_size: u64,
    /// Hits requested per window.
    pub page_size: usize,
    /// Scaling applied to balances.
    pub scale: ScaleConfig,
    /// Node lookups in flight during a backfill.
    pub concurrency: usize,
    /// Capacity of the delete worker's queue.
    pub delete_queue: usize,
    /// Ids per bulk delete.
    pub delete_batch: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            batch_size: 10_000,
            page_size: DEFAULT_SEARCH_SIZE,
            scale: ScaleConfig::default(),
            concurrency: 16,
            delete_queue: 1_024,
            delete_batch: 500,
        }
    }
}

impl ResolverConfig {
    /// Sets the window size.
    pub const fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the page size.
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the scaling config.
    pub const fn with_scale(mut self, scale: ScaleConfig) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the delete batch size.
    pub const fn with_delete_batch(mut self, delete_batch: usize) -> Self {
        self.delete_batch = delete_batch;
        self
    }
}

/// The block range a pass covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockSpan {
    /// First block.
    pub from: u64,
    /// Last block, inclusive. `None` means the highest committed block.
    pub to: Option<u64>,
}

impl BlockSpan {
    /// Creates a new [`BlockSpan`].
    pub const fn new(from: u64, to: Option<u64>) -> Self {
        Self { from, to }
    }

    /// Splits `[from, to]` into windows of `size` blocks. The last window is cut
    /// at `to`.
    pub fn windows(self, to: u64, size: u64) -> impl Iterator<Item = Window> {
        let size = size.max(1);
        let end = to.saturating_add(1);
        let mut start = self.from;
        std::iter::from_fn(move || {
            if start > to || start == end {
                return None;
            }
            let window = Window { start, end: start.saturating_add(size).min(end) };
            start = window.end;
            Some(window)
        })
    }
}

/// A half-open block window `[start, end)`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display("[{start}, {end})")]
pub struct Window {
    /// First block.
    pub start: u64,
    /// One past the last block.
    pub end: u64,
}

impl Window {
    /// The last block of the window.
    pub const fn last(&self) -> u64 {
        self.end.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 24, 10, vec![(0, 10), (10, 20), (20, 25)])]
    #[case(0, 19, 10, vec![(0, 10), (10, 20)])]
    #[case(5, 5, 10, vec![(5, 6)])]
    #[case(15, 32, 10, vec![(15, 25), (25, 33)])]
    #[case(6, 5, 10, vec![])]
    fn test_windows(
        #[case] from: u64,
        #[case] to: u64,
        #[case] size: u64,
        #[case] expected: Vec<(u64, u64)>,
    ) {
        let windows: Vec<_> =
            BlockSpan::new(from, Some(to)).windows(to, size).map(|w| (w.start, w.end)).collect();
        assert_eq!(windows, expected);
    }

    #[test]
    fn test_windows_reach_u64_max() {
        let windows: Vec<_> = BlockSpan::new(u64::MAX - 1, None).windows(u64::MAX, 10).collect();
        assert_eq!(windows, vec![Window { start: u64::MAX - 1, end: u64::MAX }]);
    }

    #[test]
    fn test_window_display() {
        assert_eq!(Window { start: 10, end: 20 }.to_string(), "[10, 20)");
        assert_eq!(Window { start: 10, end: 20 }.last(), 19);
    }
}
