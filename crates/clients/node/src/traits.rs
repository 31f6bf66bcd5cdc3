//! The node abstraction consumed by the ingestion pipeline.

use crate::{NodeError, NodeResponse};
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use chainscan_codec::{RawBlock, RawTransaction};
use std::fmt::Debug;

/// Read access to a chain node.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait ChainNode: Debug + Send + Sync {
    /// Fetches the block header and transaction hashes of block `number`.
    async fn block_by_number(&self, number: u64) -> Result<NodeResponse<RawBlock>, NodeError>;

    /// Fetches the transaction at `index` in block `number`.
    async fn transaction_by_block_and_index(
        &self,
        number: u64,
        index: u64,
    ) -> Result<NodeResponse<RawTransaction>, NodeError>;

    /// Fetches the latest balance of `address`.
    async fn balance(&self, address: Address) -> Result<NodeResponse<U256>, NodeError>;

    /// Fetches the latest runtime code of `address`.
    async fn code(&self, address: Address) -> Result<NodeResponse<Bytes>, NodeError>;
}
