//! The walk loop.

use super::{PendingBlock, WalkConfig, WalkError, WalkErrorKind, WalkMode, WalkStep, WalkSummary};
use chainscan_codec::{BlockDocument, TransactionDocument, block_id, transaction_id};
use chainscan_index::{BulkItem, CreateOutcome, IndexError, IndexStore, RecordKind};
use chainscan_node_client::{ChainNode, NodeError, NodeResponse};
use futures::future::join_all;
use std::{fmt::Display, time::Duration};
use tokio_util::sync::CancellationToken;

/// Walks block numbers one at a time, writing each block and its transactions
/// before moving to the next.
#[derive(Debug)]
pub struct BlockWalker<N, S> {
    node: N,
    store: S,
    config: WalkConfig,
}

impl<N, S> BlockWalker<N, S>
where
    N: ChainNode,
    S: IndexStore,
{
    /// Creates a new [`BlockWalker`].
    pub const fn new(node: N, store: S, config: WalkConfig) -> Self {
        Self { node, store, config }
    }

    /// Returns the walker's config.
    pub const fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// The first block of the walk. In follow mode this is one past the highest
    /// committed block, or genesis on an empty index.
    pub async fn first_block(&self) -> Result<u64, IndexError> {
        match self.config.mode {
            WalkMode::Batch { from, .. } => Ok(from),
            WalkMode::Follow => {
                Ok(self.store.highest_block_number().await?.map_or(0, |highest| highest + 1))
            }
        }
    }

    /// Runs the walk until the range is exhausted, `cancel` fires, or a fatal
    /// error occurs.
    pub async fn run(&self, cancel: CancellationToken) -> Result<WalkSummary, WalkError> {
        let first = self.first_block().await.map_err(|err| WalkError {
            block: 0,
            last_committed: None,
            kind: err.into(),
        })?;
        let mut summary = WalkSummary::new(first);
        info!(target: "walker", first, mode = ?self.config.mode, targets = ?self.config.targets, "Starting walk");

        let mut step = match self.config.mode.upper_bound() {
            Some(to) if first > to => WalkStep::Done,
            _ => WalkStep::FetchBlock(first),
        };

        loop {
            if cancel.is_cancelled() {
                info!(target: "walker", "Walk cancelled");
                break;
            }

            step = match step {
                WalkStep::FetchBlock(number) => self
                    .fetch_block(number, &mut summary)
                    .await
                    .map_err(|kind| Self::fail(number, &summary, kind))?,
                WalkStep::FetchTransactions(block) => {
                    let number = block.number;
                    self.fetch_transactions(block, &mut summary)
                        .await
                        .map_err(|kind| Self::fail(number, &summary, kind))?
                }
                WalkStep::Commit(pending) => {
                    let number = pending.block.number;
                    self.commit(pending, &mut summary)
                        .await
                        .map_err(|kind| Self::fail(number, &summary, kind))?
                }
                WalkStep::Advance(number) => self.advance(number),
                WalkStep::Retry { number, delay } => {
                    tokio::select! {
                        _ = cancel.cancelled() => WalkStep::Done,
                        _ = tokio::time::sleep(delay) => WalkStep::FetchBlock(number),
                    }
                }
                WalkStep::Done => break,
            };
        }

        info!(target: "walker", %summary, "Walk finished");
        Ok(summary)
    }

    async fn fetch_block(
        &self,
        number: u64,
        summary: &mut WalkSummary,
    ) -> Result<WalkStep, WalkErrorKind> {
        let raw = match self.node.block_by_number(number).await {
            Ok(NodeResponse::Found(raw)) => raw,
            Ok(NodeResponse::Null) if self.config.mode.is_follow() => {
                debug!(target: "walker", number, "Block not produced yet");
                return Ok(Self::retry(number, self.config.head_poll_delay, "head"));
            }
            Ok(NodeResponse::Null) => {
                warn!(target: "walker", number, "Block not found, ending walk");
                return Ok(WalkStep::Done);
            }
            Ok(NodeResponse::RpcError(payload)) => {
                warn!(
                    target: "walker",
                    number,
                    code = payload.code,
                    message = %payload.message,
                    "Node returned an error for block"
                );
                return Ok(Self::retry(number, self.config.rpc_retry_delay, "rpc_error"));
            }
            Err(NodeError::Malformed(reason)) => return Ok(Self::skip(number, summary, reason)),
            Err(err) => return Err(err.into()),
        };

        let block = match BlockDocument::from_raw(&raw, &self.config.scale) {
            Ok(block) => block,
            Err(err) => return Ok(Self::skip(number, summary, err)),
        };

        if block.num_transactions == 0 || !self.config.targets.transactions() {
            return Ok(WalkStep::Commit(PendingBlock { block, transactions: Vec::new() }));
        }
        Ok(WalkStep::FetchTransactions(block))
    }

    async fn fetch_transactions(
        &self,
        block: BlockDocument,
        summary: &mut WalkSummary,
    ) -> Result<WalkStep, WalkErrorKind> {
        let number = block.number;
        let fetches = (0..block.num_transactions).map(|index| async move {
            (index, self.node.transaction_by_block_and_index(number, index).await)
        });
        let responses = join_all(fetches).await;

        let mut transactions = Vec::with_capacity(responses.len());
        for (index, response) in responses {
            let raw = match response {
                Ok(NodeResponse::Found(raw)) => raw,
                Ok(NodeResponse::Null) => {
                    warn!(target: "walker", number, index, "Transaction missing, refetching block");
                    return Ok(Self::retry(number, self.config.gap_retry_delay, "gap"));
                }
                Ok(NodeResponse::RpcError(payload)) => {
                    warn!(
                        target: "walker",
                        number,
                        index,
                        code = payload.code,
                        message = %payload.message,
                        "Node returned an error for transaction, refetching block"
                    );
                    return Ok(Self::retry(number, self.config.gap_retry_delay, "gap"));
                }
                Err(NodeError::Malformed(reason)) => {
                    return Ok(Self::skip(number, summary, reason));
                }
                Err(err) => return Err(err.into()),
            };
            match TransactionDocument::from_raw(
                &raw,
                number,
                index,
                block.timestamp,
                &self.config.scale,
            ) {
                Ok(tx) => transactions.push(tx),
                Err(err) => return Ok(Self::skip(number, summary, err)),
            }
        }

        Ok(WalkStep::Commit(PendingBlock { block, transactions }))
    }

    async fn commit(
        &self,
        pending: PendingBlock,
        summary: &mut WalkSummary,
    ) -> Result<WalkStep, WalkErrorKind> {
        let PendingBlock { block, transactions } = pending;
        let number = block.number;

        if !transactions.is_empty() {
            let items = transactions
                .iter()
                .map(|tx| -> Result<BulkItem, WalkErrorKind> {
                    let id = transaction_id(number, tx.transaction_index)?;
                    Ok(BulkItem::from_document(id.to_string(), tx)?)
                })
                .collect::<Result<Vec<_>, _>>()?;
            let outcome = self.store.bulk_create(RecordKind::Transaction, items).await?;
            debug!(
                target: "walker",
                number,
                created = outcome.succeeded,
                existing = outcome.conflicts,
                "Transactions written"
            );
        }

        // The block document is the resume checkpoint, so it goes in last.
        if self.config.targets.blocks() {
            let document = serde_json::to_value(&block).map_err(IndexError::from)?;
            let outcome = self.store.create_one(RecordKind::Block, block_id(number), document).await?;
            if outcome == CreateOutcome::Existed {
                debug!(target: "walker", number, "Block already indexed");
            }
        }

        let count = transactions.len() as u64;
        summary.last_committed = Some(number);
        summary.blocks += 1;
        summary.transactions += count;
        info!(target: "walker", number, transactions = count, "Committed block");

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(crate::Metrics::WALKER_BLOCKS_TOTAL).increment(1);
            metrics::counter!(crate::Metrics::WALKER_TRANSACTIONS_TOTAL).increment(count);
            metrics::gauge!(crate::Metrics::WALKER_HEAD).set(number as f64);
        }

        Ok(WalkStep::Advance(number))
    }

    fn advance(&self, number: u64) -> WalkStep {
        match self.config.mode.upper_bound() {
            Some(to) if number >= to => WalkStep::Done,
            _ => number.checked_add(1).map_or(WalkStep::Done, WalkStep::FetchBlock),
        }
    }

    fn retry(number: u64, delay: Duration, reason: &'static str) -> WalkStep {
        trace!(target: "walker", number, ?delay, reason, "Scheduling refetch");
        #[cfg(feature = "metrics")]
        metrics::counter!(crate::Metrics::WALKER_RETRIES_TOTAL, "reason" => reason).increment(1);
        WalkStep::Retry { number, delay }
    }

    fn skip(number: u64, summary: &mut WalkSummary, reason: impl Display) -> WalkStep {
        error!(target: "walker", number, %reason, "Dropping block with undecodable records");
        summary.skipped.push(number);
        #[cfg(feature = "metrics")]
        metrics::counter!(crate::Metrics::WALKER_SKIPPED_TOTAL).increment(1);
        WalkStep::Advance(number)
    }

    fn fail(block: u64, summary: &WalkSummary, kind: WalkErrorKind) -> WalkError {
        let err = WalkError { block, last_committed: summary.last_committed, kind };
        error!(target: "walker", %err, "Walk failed");
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        WalkTargets,
        test_utils::{Journal, MemoryIndex, MockChain, NodeCall, NodeFault, raw_block, raw_transaction},
    };
    use chainscan_node_client::MockChainNode;
    use serde_json::json;

    fn batch(from: u64, to: Option<u64>) -> WalkConfig {
        WalkConfig::new(WalkMode::Batch { from, to }, WalkTargets::Both)
            .with_delays(Duration::from_millis(1))
    }

    async fn walk(chain: &MockChain, store: &MemoryIndex, config: WalkConfig) -> WalkSummary {
        BlockWalker::new(chain.clone(), store.clone(), config)
            .run(CancellationToken::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_batch_visits_each_block_once_in_order() {
        let chain = MockChain::with_blocks(5, |n| n % 3);
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(0, Some(4))).await;

        assert_eq!(summary.last_committed, Some(4));
        assert_eq!(summary.blocks, 5);
        assert_eq!(summary.transactions, 4);
        let fetched: Vec<_> = chain
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                NodeCall::Block(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(fetched, vec![0, 1, 2, 3, 4]);
        assert_eq!(store.documents(RecordKind::Block).len(), 5);
        assert_eq!(store.documents(RecordKind::Transaction).len(), 4);
        // One bulk write per non-empty block.
        assert_eq!(store.bulk_creates(RecordKind::Transaction), 3);
        assert_eq!(summary.to_string(), "processed through block 4, 5 blocks, 4 transactions, 0 skipped");
    }

    #[tokio::test]
    async fn test_transaction_document_ids() {
        let chain = MockChain::with_blocks(6, |n| if n == 5 { 2 } else { 0 });
        let store = MemoryIndex::new();

        walk(&chain, &store, batch(5, Some(5))).await;

        let ids: Vec<_> = store.documents(RecordKind::Transaction).into_keys().collect();
        assert_eq!(ids, vec!["500000", "500001"]);
        let tx = store.get(RecordKind::Transaction, "500001").unwrap();
        assert_eq!(tx["blockNumber"], 5);
        assert_eq!(tx["transactionIndex"], 1);
        assert_eq!(tx["timestamp"], json!((1_438_269_960u64 + 75) * 1000 + 1));
    }

    #[tokio::test]
    async fn test_empty_blocks_skip_fan_out_and_bulk() {
        let chain = MockChain::with_blocks(3, |_| 0);
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(0, Some(2))).await;

        assert_eq!(summary.blocks, 3);
        assert!(chain.calls().iter().all(|call| matches!(call, NodeCall::Block(_))));
        assert_eq!(store.bulk_creates(RecordKind::Transaction), 0);
    }

    #[tokio::test]
    async fn test_rerun_over_committed_range_succeeds() {
        let chain = MockChain::with_blocks(3, |_| 2);
        let store = MemoryIndex::new();

        walk(&chain, &store, batch(0, Some(2))).await;
        let blocks = store.documents(RecordKind::Block);
        let transactions = store.documents(RecordKind::Transaction);

        let summary = walk(&chain, &store, batch(0, Some(2))).await;
        assert_eq!(summary.last_committed, Some(2));
        assert_eq!(store.documents(RecordKind::Block), blocks);
        assert_eq!(store.documents(RecordKind::Transaction), transactions);
    }

    #[tokio::test]
    async fn test_missing_transaction_refetches_whole_block() {
        let chain = MockChain::with_blocks(1, |_| 3);
        chain.push_fault(NodeCall::Transaction(0, 1), NodeFault::Null);
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(0, Some(0))).await;

        assert_eq!(summary.transactions, 3);
        assert_eq!(chain.call_count(NodeCall::Block(0)), 2);
        assert_eq!(chain.call_count(NodeCall::Transaction(0, 0)), 2);
        assert_eq!(chain.call_count(NodeCall::Transaction(0, 2)), 2);
        assert_eq!(store.bulk_creates(RecordKind::Transaction), 1);
        assert_eq!(store.documents(RecordKind::Transaction).len(), 3);
    }

    #[tokio::test]
    async fn test_transaction_rpc_error_refetches_whole_block() {
        let chain = MockChain::with_blocks(1, |_| 2);
        chain.push_fault(NodeCall::Transaction(0, 0), NodeFault::RpcError("pruned".into()));
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(0, Some(0))).await;

        assert_eq!(summary.transactions, 2);
        assert_eq!(chain.call_count(NodeCall::Block(0)), 2);
    }

    #[tokio::test]
    async fn test_block_rpc_error_is_retried() {
        let chain = MockChain::with_blocks(3, |_| 1);
        chain.push_fault(NodeCall::Block(1), NodeFault::RpcError("busy".into()));
        chain.push_fault(NodeCall::Block(1), NodeFault::RpcError("busy".into()));
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(0, Some(2))).await;

        assert_eq!(summary.blocks, 3);
        assert_eq!(chain.call_count(NodeCall::Block(1)), 3);
    }

    #[tokio::test]
    async fn test_batch_without_bound_ends_at_missing_block() {
        let chain = MockChain::with_blocks(3, |_| 1);
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(0, None)).await;

        assert_eq!(summary.last_committed, Some(2));
        assert_eq!(chain.call_count(NodeCall::Block(3)), 1);
    }

    #[tokio::test]
    async fn test_empty_range_does_nothing() {
        let chain = MockChain::with_blocks(3, |_| 1);
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(2, Some(1))).await;

        assert_eq!(summary.blocks, 0);
        assert!(chain.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_block_is_skipped() {
        let chain = MockChain::with_blocks(3, |_| 1);
        chain.push_fault(
            NodeCall::Block(1),
            NodeFault::Error(NodeError::Malformed("invalid type".into())),
        );
        let mut broken = raw_transaction(2, 0);
        broken.value = "0xzz".to_string();
        chain.set_transaction(2, 0, broken);
        let store = MemoryIndex::new();

        let summary = walk(&chain, &store, batch(0, Some(2))).await;

        assert_eq!(summary.skipped, vec![1, 2]);
        assert_eq!(summary.last_committed, Some(0));
        assert_eq!(store.documents(RecordKind::Block).len(), 1);
    }

    #[tokio::test]
    async fn test_next_block_waits_for_commit() {
        let journal = Journal::default();
        let chain = MockChain::with_blocks(3, |_| 2).with_journal(journal.clone());
        let store = MemoryIndex::new().with_journal(journal.clone());

        walk(&chain, &store, batch(0, Some(2))).await;

        let entries = journal.entries();
        for number in 0..2 {
            let committed = journal.position(&format!("index create block {number}")).unwrap();
            let written = entries[..committed]
                .iter()
                .rposition(|e| e.starts_with("index bulk create transaction"))
                .unwrap();
            let last_tx = journal.position(&format!("node tx {number}/1")).unwrap();
            let next = journal.position(&format!("node block {}", number + 1)).unwrap();
            assert!(last_tx < written, "block {number} written before its transactions joined");
            assert!(written < committed, "block {number} recorded before its transactions");
            assert!(committed < next, "block {} fetched before block {number} committed", number + 1);
        }
    }

    #[tokio::test]
    async fn test_blocks_only_skips_transactions() {
        let chain = MockChain::with_blocks(2, |_| 2);
        let store = MemoryIndex::new();
        let config = WalkConfig::new(WalkMode::Batch { from: 0, to: Some(1) }, WalkTargets::Blocks);

        let summary = walk(&chain, &store, config).await;

        assert_eq!(summary.transactions, 0);
        assert_eq!(store.documents(RecordKind::Block).len(), 2);
        assert!(store.documents(RecordKind::Transaction).is_empty());
        assert!(chain.calls().iter().all(|call| matches!(call, NodeCall::Block(_))));
    }

    #[tokio::test]
    async fn test_transactions_only_skips_blocks() {
        let chain = MockChain::with_blocks(2, |_| 2);
        let store = MemoryIndex::new();
        let config =
            WalkConfig::new(WalkMode::Batch { from: 0, to: Some(1) }, WalkTargets::Transactions);

        let summary = walk(&chain, &store, config).await;

        assert_eq!(summary.transactions, 4);
        assert!(store.documents(RecordKind::Block).is_empty());
        assert_eq!(store.documents(RecordKind::Transaction).len(), 4);
    }

    #[tokio::test]
    async fn test_node_unavailable_is_fatal() {
        let mut node = MockChainNode::new();
        node.expect_block_by_number().returning(|number| {
            if number < 2 {
                Ok(NodeResponse::Found(raw_block(number, 0)))
            } else {
                Err(NodeError::Unavailable { attempts: 11, reason: "connection refused".into() })
            }
        });
        let store = MemoryIndex::new();

        let err = BlockWalker::new(node, store, batch(0, Some(10)))
            .run(CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.block, 2);
        assert_eq!(err.last_committed, Some(1));
        assert!(matches!(err.kind, WalkErrorKind::Node(NodeError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_index_rejection_is_fatal() {
        let chain = MockChain::with_blocks(3, |_| 1);
        let store = MemoryIndex::new();
        store.reject_id("100000");

        let err = BlockWalker::new(chain, store, batch(0, Some(2)))
            .run(CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.block, 1);
        assert_eq!(err.last_committed, Some(0));
        assert!(matches!(err.kind, WalkErrorKind::Index(IndexError::BulkItems(_))));
    }

    #[tokio::test]
    async fn test_failed_transaction_write_keeps_block_resumable() {
        let chain = MockChain::with_blocks(3, |_| 1);
        let store = MemoryIndex::new();
        store.reject_id("100000");

        let err = BlockWalker::new(chain.clone(), store.clone(), batch(0, Some(2)))
            .run(CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.block, 1);

        assert!(store.get(RecordKind::Block, "1").is_none());
        assert!(store.get(RecordKind::Transaction, "100000").is_none());
        let follow = BlockWalker::new(
            chain,
            store.clone(),
            WalkConfig::new(WalkMode::Follow, WalkTargets::Both),
        );
        assert_eq!(follow.first_block().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_block_without_document_is_rewalked() {
        let chain = MockChain::with_blocks(2, |_| 2);
        let store = MemoryIndex::new();
        walk(&chain, &store, batch(0, Some(0))).await;
        // Block 1's transactions are durable but its block document never landed.
        let transactions_only =
            WalkConfig::new(WalkMode::Batch { from: 1, to: Some(1) }, WalkTargets::Transactions);
        walk(&chain, &store, transactions_only).await;

        let follow = BlockWalker::new(
            chain.clone(),
            store.clone(),
            WalkConfig::new(WalkMode::Follow, WalkTargets::Both),
        );
        assert_eq!(follow.first_block().await.unwrap(), 1);

        let summary = walk(&chain, &store, batch(1, Some(1))).await;

        assert_eq!(summary.last_committed, Some(1));
        assert!(store.get(RecordKind::Block, "1").is_some());
        assert_eq!(store.documents(RecordKind::Transaction).len(), 4);
    }

    #[tokio::test]
    async fn test_follow_starts_after_highest_block() {
        let chain = MockChain::new();
        let store = MemoryIndex::new();
        let config = WalkConfig::new(WalkMode::Follow, WalkTargets::Both);
        let walker = BlockWalker::new(chain, store.clone(), config);

        assert_eq!(walker.first_block().await.unwrap(), 0);
        store.insert(RecordKind::Block, "7", json!({ "number": 7 }));
        assert_eq!(walker.first_block().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_follow_waits_for_new_blocks_until_cancelled() {
        let chain = MockChain::with_blocks(2, |_| 1);
        let store = MemoryIndex::new();
        let config = WalkConfig::new(WalkMode::Follow, WalkTargets::Both)
            .with_delays(Duration::from_millis(5));
        let walker = BlockWalker::new(chain.clone(), store.clone(), config);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn({
            let cancel = cancel.clone();
            async move { walker.run(cancel).await }
        });

        tokio::time::timeout(Duration::from_secs(5), async {
            while chain.call_count(NodeCall::Block(2)) < 2 {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap();
        assert_eq!(store.documents(RecordKind::Block).len(), 2);

        chain.insert_block(raw_block(2, 1), vec![raw_transaction(2, 0)]);
        tokio::time::timeout(Duration::from_secs(5), async {
            while store.get(RecordKind::Block, "2").is_none() {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .unwrap();

        cancel.cancel();
        let summary = handle.await.unwrap().unwrap();
        assert_eq!(summary.first, 0);
        assert_eq!(summary.last_committed, Some(2));
        assert_eq!(summary.transactions, 3);
    }

    #[tokio::test]
    async fn test_cancelled_walk_returns_empty_summary() {
        let chain = MockChain::with_blocks(3, |_| 1);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = BlockWalker::new(chain.clone(), MemoryIndex::new(), batch(0, Some(2)))
            .run(cancel)
            .await
            .unwrap();

        assert_eq!(summary.last_committed, None);
        assert!(chain.calls().is_empty());
    }
}
