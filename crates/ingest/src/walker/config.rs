use chainscan_codec::ScaleConfig;
use std::time::Duration;

/// How the walker chooses its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkMode {
    /// Walk `[from, to]` once. Without `to` the walk ends at the first block the
    /// node does not have.
    Batch {
        /// First block.
        from: u64,
        /// Last block, inclusive.
        to: Option<u64>,
    },
    /// Start after the highest committed block and tail the chain forever.
    Follow,
}

impl WalkMode {
    /// The inclusive upper bound, if any.
    pub const fn upper_bound(&self) -> Option<u64> {
        match self {
            Self::Batch { to, .. } => *to,
            Self::Follow => None,
        }
    }

    /// Returns `true` for [`WalkMode::Follow`].
    pub const fn is_follow(&self) -> bool {
        matches!(self, Self::Follow)
    }
}

/// The record kinds a walk writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkTargets {
    /// Blocks only.
    Blocks,
    /// Transactions only.
    Transactions,
    /// Blocks and their transactions.
    #[default]
    Both,
}

impl WalkTargets {
    /// Whether block documents are written.
    pub const fn blocks(self) -> bool {
        matches!(self, Self::Blocks | Self::Both)
    }

    /// Whether transaction documents are written.
    pub const fn transactions(self) -> bool {
        matches!(self, Self::Transactions | Self::Both)
    }
}

/// Walker settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkConfig {
    /// Range selection.
    pub mode: WalkMode,
    /// Record kinds to write.
    pub targets: WalkTargets,
    /// Wait before asking again for a block that has not been produced yet.
    pub head_poll_delay: Duration,
    /// Wait before retrying a block after the node returned an RPC error.
    pub rpc_retry_delay: Duration,
    /// Wait before refetching a block whose transaction set came back incomplete.
    pub gap_retry_delay: Duration,
    /// Scaling applied to wide numeric fields.
    pub scale: ScaleConfig,
}

impl WalkConfig {
    /// Creates a config with the default delays.
    pub fn new(mode: WalkMode, targets: WalkTargets) -> Self {
        Self {
            mode,
            targets,
            head_poll_delay: Duration::from_secs(12),
            rpc_retry_delay: Duration::from_secs(4),
            gap_retry_delay: Duration::from_secs(1),
            scale: ScaleConfig::default(),
        }
    }

    /// Sets all three retry delays to `delay`.
    pub const fn with_delays(mut self, delay: Duration) -> Self {
        self.head_poll_delay = delay;
        self.rpc_retry_delay = delay;
        self.gap_retry_delay = delay;
        self
    }

    /// Sets the scaling config.
    pub const fn with_scale(mut self, scale: ScaleConfig) -> Self {
        self.scale = scale;
        self
    }
}
