//! Contract document removal through a single delete worker.

use super::{BlockSpan, ContractResolver, PassSummary, ResolverError, resolver::WindowTally};
use chainscan_index::{BulkOutcome, IndexError, IndexStore, RecordKind};
use chainscan_node_client::ChainNode;
use tokio::sync::mpsc;

impl<N, S> ContractResolver<N, S>
where
    N: ChainNode,
    S: IndexStore + Clone + 'static,
{
    /// Deletes every contract document created in `span`.
    ///
    /// Window searches feed ids into a bounded queue owned by one worker task,
    /// which removes them in bulk batches.
    pub async fn wipe(&self, span: BlockSpan) -> Result<PassSummary, ResolverError> {
        let (queue, ids) = mpsc::channel(self.config.delete_queue.max(1));
        let worker =
            tokio::spawn(delete_worker(self.store.clone(), ids, self.config.delete_batch.max(1)));

        let queued = self
            .run_pass("wipe", span, |window| {
                let queue = queue.clone();
                async move {
                    let hits = self.search_window(RecordKind::Contract, window, false).await?;
                    let found = hits.len() as u64;
                    for hit in hits {
                        queue.send(hit.id).await.map_err(|_| {
                            ResolverError::DeleteWorker("delete queue closed".to_string())
                        })?;
                    }
                    Ok(WindowTally { found, ..Default::default() })
                }
            })
            .await;
        drop(queue);

        let deleted = match worker.await {
            Ok(Ok(totals)) => totals.succeeded as u64,
            Ok(Err(err)) => return Err(err.into()),
            Err(err) => return Err(ResolverError::DeleteWorker(err.to_string())),
        };
        let mut summary = queued?;
        summary.written = deleted;
        info!(target: "contracts", deleted, "Contract documents deleted");
        Ok(summary)
    }
}

/// Drains `ids` in batches of up to `batch` and deletes them.
async fn delete_worker<S: IndexStore>(
    store: S,
    mut ids: mpsc::Receiver<String>,
    batch: usize,
) -> Result<BulkOutcome, IndexError> {
    let mut pending = Vec::with_capacity(batch);
    let mut totals = BulkOutcome::default();
    while ids.recv_many(&mut pending, batch).await > 0 {
        let outcome = store.bulk_delete(RecordKind::Contract, std::mem::take(&mut pending)).await?;
        debug!(
            target: "contracts",
            deleted = outcome.succeeded,
            missing = outcome.conflicts,
            "Deleted contract batch"
        );
        totals.merge(outcome);
    }
    debug!(target: "contracts", requested = totals.total(), "Delete queue drained");
    Ok(totals)
}
