//! The optional TOML config file.

use chainscan_codec::ScaleConfig;
use serde::Deserialize;
use url::Url;

/// Settings read from `--config`. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Node connection.
    pub node: NodeSection,
    /// Index store connection and layout.
    pub index: IndexSection,
    /// Numeric scaling.
    pub scale: Option<ScaleConfig>,
    /// Block walker delays.
    pub walker: WalkerSection,
    /// Contract pass tuning.
    pub contracts: ContractsSection,
}

/// The `[node]` table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeSection {
    /// JSON-RPC endpoint.
    pub url: Option<Url>,
    /// Retry ceiling.
    pub retry_attempts: Option<usize>,
    /// Retry delay in milliseconds.
    pub retry_delay_ms: Option<u64>,
    /// Request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// The `[index]` table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexSection {
    /// REST endpoint.
    pub url: Option<Url>,
    /// Index name prefix.
    pub prefix: Option<String>,
    /// Retry delay in milliseconds.
    pub retry_delay_ms: Option<u64>,
    /// Retry ceiling.
    pub retry_attempts: Option<usize>,
    /// Hits per search page.
    pub search_size: Option<usize>,
    /// Primary shards per index.
    pub shards: Option<u32>,
    /// Replicas per index.
    pub replicas: Option<u32>,
}

/// The `[walker]` table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WalkerSection {
    /// Wait before polling again for an unproduced block, in milliseconds.
    pub head_poll_delay_ms: Option<u64>,
    /// Wait before retrying after a node RPC error, in milliseconds.
    pub rpc_retry_delay_ms: Option<u64>,
    /// Wait before refetching a block with a missing transaction, in milliseconds.
    pub gap_retry_delay_ms: Option<u64>,
}

/// The `[contracts]` table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractsSection {
    /// Blocks per window.
    pub batch_size: Option<u64>,
    /// Node lookups in flight during a backfill.
    pub concurrency: Option<usize>,
    /// Ids per bulk delete.
    pub delete_batch: Option<usize>,
}
