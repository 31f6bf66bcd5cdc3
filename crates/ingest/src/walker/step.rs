use chainscan_codec::{BlockDocument, TransactionDocument};
use std::time::Duration;

/// A block with all of its transactions, ready to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBlock {
    /// The block document.
    pub block: BlockDocument,
    /// The block's transactions in index order. Empty when transactions are not
    /// a walk target.
    pub transactions: Vec<TransactionDocument>,
}

/// A state of the walk loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WalkStep {
    /// Fetch the block with this number.
    FetchBlock(u64),
    /// Fetch every transaction of a block, then join on the full set.
    FetchTransactions(BlockDocument),
    /// Write the block and its transaction set.
    Commit(PendingBlock),
    /// The block with this number is done; move past it.
    Advance(u64),
    /// Wait, then fetch the block with this number again.
    Retry {
        /// Block to refetch.
        number: u64,
        /// Time to wait.
        delay: Duration,
    },
    /// The walk is over.
    Done,
}
