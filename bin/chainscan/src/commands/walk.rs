//! The block walking modes.

use super::Commands;
use crate::flags::Settings;
use anyhow::Result;
use chainscan_ingest::{BlockWalker, WalkMode, WalkTargets};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Walks the chain with `mode` and `targets` until done or cancelled.
pub(super) async fn run(
    settings: &Settings,
    mode: WalkMode,
    targets: WalkTargets,
    cancel: CancellationToken,
) -> Result<()> {
    let walker = BlockWalker::new(
        Commands::node(settings)?,
        Commands::index(settings)?,
        settings.walk(mode, targets),
    );

    match walker.run(cancel).await {
        Ok(summary) => {
            if !summary.skipped.is_empty() {
                warn!(
                    target: "chainscan",
                    blocks = ?summary.skipped,
                    "Blocks were skipped and are missing from the index"
                );
            }
            info!(target: "chainscan", "{summary}");
            Ok(())
        }
        Err(err) => {
            let through = err.last_committed.map_or_else(|| "none".to_string(), |n| n.to_string());
            error!(target: "chainscan", block = err.block, "processed through block {through}");
            Err(err.into())
        }
    }
}
