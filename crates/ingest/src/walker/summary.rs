use derive_more::Display;

/// Totals of a finished walk.
#[derive(Debug, Display, Clone, Default, PartialEq, Eq)]
#[display(
    "processed through block {}, {blocks} blocks, {transactions} transactions, {} skipped",
    last_committed.map_or_else(|| "none".to_string(), |n| n.to_string()),
    skipped.len()
)]
pub struct WalkSummary {
    /// First block of the walk.
    pub first: u64,
    /// Last block whose records were committed.
    pub last_committed: Option<u64>,
    /// Blocks processed.
    pub blocks: u64,
    /// Transactions written.
    pub transactions: u64,
    /// Blocks dropped because the node returned records that could not be decoded.
    pub skipped: Vec<u64>,
}

impl WalkSummary {
    /// Creates an empty summary for a walk starting at `first`.
    pub fn new(first: u64) -> Self {
        Self { first, ..Default::default() }
    }
}
