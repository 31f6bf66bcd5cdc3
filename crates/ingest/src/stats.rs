//! Document counts of the index.

use chainscan_index::{IndexError, IndexStore, RecordKind};
use derive_more::Display;

/// A snapshot of what the index holds.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq)]
#[display(
    "{blocks} blocks, {transactions} transactions, {contracts} contracts, highest block {}",
    highest_block.map_or_else(|| "none".to_string(), |n| n.to_string())
)]
pub struct IndexStats {
    /// Block documents.
    pub blocks: u64,
    /// Transaction documents.
    pub transactions: u64,
    /// Contract documents.
    pub contracts: u64,
    /// Highest committed block number.
    pub highest_block: Option<u64>,
}

impl IndexStats {
    /// Reads the counts from `store`.
    pub async fn collect<S: IndexStore + ?Sized>(store: &S) -> Result<Self, IndexError> {
        Ok(Self {
            blocks: store.count(RecordKind::Block).await?,
            transactions: store.count(RecordKind::Transaction).await?,
            contracts: store.count(RecordKind::Contract).await?,
            highest_block: store.highest_block_number().await?,
        })
    }

    /// Blocks between genesis and the highest block that have no document.
    pub fn missing_blocks(&self) -> u64 {
        self.highest_block.map_or(0, |highest| (highest + 1).saturating_sub(self.blocks))
    }
}
