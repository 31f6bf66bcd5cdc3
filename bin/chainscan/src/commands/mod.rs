//! Contains the chainscan modes.

mod contracts;
pub use contracts::{ContractPass, WipeContractsCommand};

mod disasm;
pub use disasm::DisasmCommand;

mod guess;
pub use guess::GuessCommand;

mod setup;
pub use setup::{SetupCommand, confirm};

mod stats;

mod walk;

use crate::flags::{GlobalArgs, RangeArgs, Settings};
use anyhow::Result;
use chainscan_index::ElasticIndex;
use chainscan_ingest::{WalkMode, WalkTargets};
use chainscan_node_client::NodeClient;
use clap::Subcommand;
use tokio_util::sync::CancellationToken;

/// Modes of the CLI.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print document counts of the index.
    Stats,
    /// Tail the chain from the block after the highest indexed one.
    Follow,
    /// Index blocks and transactions over a range.
    Batch(RangeArgs),
    /// Index block documents only over a range.
    Blocks(RangeArgs),
    /// Index transaction documents only over a range.
    Transactions(RangeArgs),
    /// Derive contract documents from indexed creation transactions.
    Contracts(RangeArgs),
    /// Refresh contract balances from the node.
    #[command(alias = "contractBalances")]
    ContractBalances(RangeArgs),
    /// Refresh contract code fingerprints from the node.
    #[command(alias = "contractCodes")]
    ContractCodes(RangeArgs),
    /// Recreate every index with its mapping. Destroys indexed data.
    Setup(SetupCommand),
    /// Delete contract documents over a range.
    #[command(alias = "wipeContracts")]
    WipeContracts(WipeContractsCommand),
    /// Disassemble EVM bytecode.
    Disasm(DisasmCommand),
    /// Recover a function signature from its selector.
    Guess(GuessCommand),
}

impl Commands {
    /// Runs the mode until it finishes or `cancel` fires.
    pub async fn run(self, args: &GlobalArgs, cancel: CancellationToken) -> Result<()> {
        // Offline modes need no settings.
        match self {
            Self::Guess(guess) => return guess.run(),
            Self::Disasm(disasm) if disasm.address.is_none() => {
                return disasm.run::<NodeClient>(None).await;
            }
            _ => {}
        }

        let settings = Settings::load(args)?;
        match self {
            Self::Stats => stats::run(&Self::index(&settings)?).await,
            Self::Follow => {
                walk::run(&settings, WalkMode::Follow, WalkTargets::Both, cancel).await
            }
            Self::Batch(range) => {
                walk::run(&settings, range.walk_mode(), WalkTargets::Both, cancel).await
            }
            Self::Blocks(range) => {
                walk::run(&settings, range.walk_mode(), WalkTargets::Blocks, cancel).await
            }
            Self::Transactions(range) => {
                walk::run(&settings, range.walk_mode(), WalkTargets::Transactions, cancel).await
            }
            Self::Contracts(range) => {
                ContractPass::Discover.run(&settings, args, range, cancel).await
            }
            Self::ContractBalances(range) => {
                ContractPass::Balances.run(&settings, args, range, cancel).await
            }
            Self::ContractCodes(range) => {
                ContractPass::Codes.run(&settings, args, range, cancel).await
            }
            Self::Setup(setup) => setup.run(&Self::index(&settings)?).await,
            Self::WipeContracts(wipe) => wipe.run(&settings, args, cancel).await,
            Self::Disasm(disasm) => disasm.run(Some(&Self::node(&settings)?)).await,
            Self::Guess(_) => Ok(()),
        }
    }

    /// Connects the index store.
    pub(crate) fn index(settings: &Settings) -> Result<ElasticIndex> {
        Ok(ElasticIndex::new(settings.index.clone())?)
    }

    /// Connects the node client.
    pub(crate) fn node(settings: &Settings) -> Result<NodeClient> {
        Ok(NodeClient::new(settings.node.clone())?)
    }
}
