//! Block range flags.

use chainscan_ingest::{BlockSpan, WalkMode};
use clap::Parser;

/// An inclusive block range.
#[derive(Parser, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeArgs {
    /// First block.
    #[arg(long, short, default_value_t = 0)]
    pub from: u64,
    /// Last block, inclusive. Defaults to the chain head for walks and to the
    /// highest indexed block for contract passes.
    #[arg(long, short)]
    pub to: Option<u64>,
}

impl RangeArgs {
    /// The walk mode for this range.
    pub const fn walk_mode(self) -> WalkMode {
        WalkMode::Batch { from: self.from, to: self.to }
    }

    /// The contract pass span for this range.
    pub const fn span(self) -> BlockSpan {
        BlockSpan::new(self.from, self.to)
    }
}
