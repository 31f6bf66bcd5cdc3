//! The contract passes.

use super::{Commands, setup::confirm_or_bail};
use crate::flags::{GlobalArgs, RangeArgs, Settings};
use anyhow::{Result, bail};
use chainscan_ingest::{ContractResolver, PassSummary, ResolverError};
use clap::Parser;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A contract pass over indexed documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractPass {
    /// Derive contract documents from creation transactions.
    Discover,
    /// Refresh balances.
    Balances,
    /// Refresh code fingerprints.
    Codes,
}

impl ContractPass {
    /// Runs the pass over `range` until it finishes or `cancel` fires.
    pub async fn run(
        self,
        settings: &Settings,
        args: &GlobalArgs,
        range: RangeArgs,
        cancel: CancellationToken,
    ) -> Result<()> {
        let resolver = ContractResolver::new(
            Commands::node(settings)?,
            Commands::index(settings)?,
            settings.resolver(args.contracts_batch_size),
        );
        let span = range.span();
        match self {
            Self::Discover => until_cancelled(resolver.discover(span), cancel).await,
            Self::Balances => until_cancelled(resolver.backfill_balances(span), cancel).await,
            Self::Codes => until_cancelled(resolver.backfill_codes(span), cancel).await,
        }
    }
}

/// The `wipe-contracts` mode.
#[derive(Parser, Debug, Clone)]
#[command(about = "Deletes contract documents created over a range")]
pub struct WipeContractsCommand {
    /// Blocks to wipe.
    #[command(flatten)]
    pub range: RangeArgs,
    /// Skip the confirmation prompt.
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl WipeContractsCommand {
    /// Runs the wipe.
    pub async fn run(
        self,
        settings: &Settings,
        args: &GlobalArgs,
        cancel: CancellationToken,
    ) -> Result<()> {
        let prompt = format!(
            "Delete contract documents from block {} through {}?",
            self.range.from,
            self.range.to.map_or_else(|| "the highest indexed block".to_string(), |n| n.to_string())
        );
        confirm_or_bail(self.yes, &prompt)?;

        let resolver = ContractResolver::new(
            Commands::node(settings)?,
            Commands::index(settings)?,
            settings.resolver(args.contracts_batch_size),
        );
        until_cancelled(resolver.wipe(self.range.span()), cancel).await
    }
}

/// Drives `pass` to completion unless `cancel` fires first.
async fn until_cancelled(
    pass: impl Future<Output = Result<PassSummary, ResolverError>>,
    cancel: CancellationToken,
) -> Result<()> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!(target: "chainscan", "Contract pass cancelled, rerun to resume");
            bail!("contract pass cancelled")
        }
        summary = pass => {
            let summary = summary?;
            info!(target: "chainscan", "{summary}");
            Ok(())
        }
    }
}
