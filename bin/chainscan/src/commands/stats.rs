//! The `stats` mode.

use anyhow::Result;
use chainscan_index::IndexStore;
use chainscan_ingest::IndexStats;
use tracing::warn;

/// Prints the document counts of `store`.
pub(super) async fn run<S: IndexStore>(store: &S) -> Result<()> {
    let stats = IndexStats::collect(store).await?;
    println!("{stats}");
    let missing = stats.missing_blocks();
    if missing > 0 {
        warn!(target: "chainscan", missing, "Index has gaps below the highest block");
    }
    Ok(())
}
