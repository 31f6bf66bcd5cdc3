//! Contract discovery and the balance and code backfills.

use super::{BlockSpan, PassSummary, ResolverConfig, ResolverError, Window};
use alloy_primitives::Address;
use chainscan_codec::{
    BalanceUpdate, CodeUpdate, ContractDocument, TransactionDocument, address_id,
};
use chainscan_index::{BulkItem, Hit, IndexError, IndexStore, RecordKind, SearchQuery};
use chainscan_node_client::{ChainNode, NodeError, NodeResponse};
use futures::{StreamExt, stream};
use serde_json::Value;
use std::future::Future;

/// Counts for one completed window.
#[derive(Debug, Default)]
pub(super) struct WindowTally {
    pub(super) found: u64,
    pub(super) written: u64,
    pub(super) skipped: u64,
}

#[derive(Debug, Clone, Copy)]
enum Backfill {
    Balance,
    Code,
}

impl Backfill {
    const fn pass(self) -> &'static str {
        match self {
            Self::Balance => "balances",
            Self::Code => "codes",
        }
    }
}

/// Derives contract documents from committed transactions and fills in their
/// balance and code.
///
/// Every pass walks the committed block range in fixed-size windows and works
/// on the documents a window search returns.
#[derive(Debug)]
pub struct ContractResolver<N, S> {
    pub(super) node: N,
    pub(super) store: S,
    pub(super) config: ResolverConfig,
}

impl<N, S> ContractResolver<N, S>
where
    N: ChainNode,
    S: IndexStore,
{
    /// Creates a new [`ContractResolver`].
    pub const fn new(node: N, store: S, config: ResolverConfig) -> Self {
        Self { node, store, config }
    }

    /// Returns the resolver's config.
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Creates a contract document for every contract-creation transaction in
    /// `span`. Contracts that already exist are left untouched.
    pub async fn discover(&self, span: BlockSpan) -> Result<PassSummary, ResolverError> {
        self.run_pass("discover", span, |window| self.discover_window(window)).await
    }

    /// Writes the latest balance of every contract created in `span`.
    pub async fn backfill_balances(&self, span: BlockSpan) -> Result<PassSummary, ResolverError> {
        self.run_pass(Backfill::Balance.pass(), span, |window| {
            self.backfill_window(window, Backfill::Balance)
        })
        .await
    }

    /// Writes the runtime code of every contract created in `span`.
    pub async fn backfill_codes(&self, span: BlockSpan) -> Result<PassSummary, ResolverError> {
        self.run_pass(Backfill::Code.pass(), span, |window| {
            self.backfill_window(window, Backfill::Code)
        })
        .await
    }

    /// Runs `window_fn` over every window of `span`, stopping at the first error.
    pub(super) async fn run_pass<F, Fut>(
        &self,
        pass: &'static str,
        span: BlockSpan,
        mut window_fn: F,
    ) -> Result<PassSummary, ResolverError>
    where
        F: FnMut(Window) -> Fut,
        Fut: Future<Output = Result<WindowTally, ResolverError>>,
    {
        let mut summary = PassSummary::default();
        let to = match span.to {
            Some(to) => to,
            None => match self.store.highest_block_number().await? {
                Some(highest) => highest,
                None => {
                    info!(target: "contracts", pass, "No committed blocks");
                    return Ok(summary);
                }
            },
        };
        info!(
            target: "contracts",
            pass,
            from = span.from,
            to,
            batch_size = self.config.batch_size,
            "Starting contract pass"
        );

        for window in span.windows(to, self.config.batch_size) {
            let tally = match window_fn(window).await {
                Ok(tally) => tally,
                Err(err) => {
                    error!(target: "contracts", pass, %window, %err, "Contract pass failed, {summary}");
                    return Err(err);
                }
            };
            if tally.found == 0 && window.last() < to {
                warn!(target: "contracts", pass, %window, "Window matched no documents");
            }
            debug!(
                target: "contracts",
                pass,
                %window,
                found = tally.found,
                written = tally.written,
                skipped = tally.skipped,
                "Window done"
            );

            #[cfg(feature = "metrics")]
            {
                metrics::counter!(crate::Metrics::RESOLVER_ITEMS_TOTAL, "pass" => pass)
                    .increment(tally.written);
                metrics::counter!(crate::Metrics::RESOLVER_SKIPPED_TOTAL, "pass" => pass)
                    .increment(tally.skipped);
            }

            summary.record(window, tally.found, tally.written, tally.skipped);
        }

        info!(target: "contracts", pass, %summary, "Contract pass finished");
        Ok(summary)
    }

    /// Fetches every `kind` document created in `window`, ordered by position in
    /// the chain.
    ///
    /// Pages of `page_size` hits are read with a `search_after` cursor on the sort
    /// keys until a short page comes back.
    pub(super) async fn search_window(
        &self,
        kind: RecordKind,
        window: Window,
        creations_only: bool,
    ) -> Result<Vec<Hit>, ResolverError> {
        let size = self.config.page_size.max(1);
        let mut query = SearchQuery::window("blockNumber", window.start, window.end)
            .sort_asc("blockNumber")
            .sort_asc("transactionIndex")
            .size(size);
        if creations_only {
            query = query.missing("to");
        }

        let mut hits = Vec::new();
        loop {
            let page = self.store.search(kind, query.clone()).await?;
            let next = match page.last() {
                Some(last) if page.len() >= size => Some(query.after(last)),
                _ => None,
            };
            hits.extend(page);
            match next {
                Some(next) => {
                    trace!(target: "contracts", %kind, %window, read = hits.len(), "Reading next page");
                    query = next;
                }
                None => return Ok(hits),
            }
        }
    }

    async fn discover_window(&self, window: Window) -> Result<WindowTally, ResolverError> {
        let hits = self.search_window(RecordKind::Transaction, window, true).await?;
        let mut tally = WindowTally { found: hits.len() as u64, ..Default::default() };

        let mut items = Vec::with_capacity(hits.len());
        for hit in &hits {
            let tx = match hit.decode::<TransactionDocument>() {
                Ok(tx) => tx,
                Err(err) => {
                    warn!(target: "contracts", id = %hit.id, %err, "Skipping undecodable transaction");
                    tally.skipped += 1;
                    continue;
                }
            };
            let Some(contract) = ContractDocument::from_creation(&tx) else {
                tally.skipped += 1;
                continue;
            };
            trace!(target: "contracts", address = %contract.address, creator = %contract.creator, "Derived contract");
            items.push(BulkItem::from_document(address_id(&contract.address), &contract)?);
        }

        if !items.is_empty() {
            let outcome = self.store.bulk_create(RecordKind::Contract, items).await?;
            tally.written = outcome.succeeded as u64;
            if outcome.conflicts > 0 {
                debug!(target: "contracts", %window, existing = outcome.conflicts, "Contracts already indexed");
            }
        }
        Ok(tally)
    }

    async fn backfill_window(
        &self,
        window: Window,
        backfill: Backfill,
    ) -> Result<WindowTally, ResolverError> {
        let hits = self.search_window(RecordKind::Contract, window, false).await?;
        let mut tally = WindowTally { found: hits.len() as u64, ..Default::default() };

        let addresses: Vec<Address> = hits
            .iter()
            .filter_map(|hit| match hit.decode::<ContractDocument>() {
                Ok(contract) => Some(contract.address),
                Err(err) => {
                    warn!(target: "contracts", id = %hit.id, %err, "Skipping undecodable contract");
                    None
                }
            })
            .collect();
        tally.skipped += (hits.len() - addresses.len()) as u64;

        let lookups: Vec<_> = stream::iter(addresses)
            .map(|address| async move { (address, self.lookup(address, backfill).await) })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut items = Vec::with_capacity(lookups.len());
        for (address, update) in lookups {
            match update? {
                Some(update) => items.push(BulkItem::new(address_id(&address), update)),
                None => tally.skipped += 1,
            }
        }

        if !items.is_empty() {
            let outcome = self.store.bulk_update(RecordKind::Contract, items).await?;
            tally.written = outcome.succeeded as u64;
        }
        Ok(tally)
    }

    /// Fetches the partial update for `address`. Per-contract node failures
    /// yield `None`.
    async fn lookup(
        &self,
        address: Address,
        backfill: Backfill,
    ) -> Result<Option<Value>, ResolverError> {
        let response = match backfill {
            Backfill::Balance => self.node.balance(address).await.map(|response| {
                response.map(|balance| {
                    serde_json::to_value(BalanceUpdate::new(balance, &self.config.scale))
                })
            }),
            Backfill::Code => self
                .node
                .code(address)
                .await
                .map(|response| response.map(|code| serde_json::to_value(CodeUpdate::new(code)))),
        };

        let pass = backfill.pass();
        match response {
            Ok(NodeResponse::Found(update)) => Ok(Some(update.map_err(IndexError::from)?)),
            Ok(NodeResponse::Null) => {
                warn!(target: "contracts", pass, %address, "Node returned no result, skipping contract");
                Ok(None)
            }
            Ok(NodeResponse::RpcError(payload)) => {
                warn!(
                    target: "contracts",
                    pass,
                    %address,
                    code = payload.code,
                    message = %payload.message,
                    "Node returned an error, skipping contract"
                );
                Ok(None)
            }
            Err(NodeError::Malformed(reason)) => {
                warn!(target: "contracts", pass, %address, %reason, "Malformed node response, skipping contract");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}
