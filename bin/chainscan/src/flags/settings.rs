//! Fully resolved runtime settings.

use super::{FileConfig, GlobalArgs};
use chainscan_cli::load_toml;
use chainscan_codec::ScaleConfig;
use chainscan_index::IndexConfig;
use chainscan_ingest::{ResolverConfig, WalkConfig, WalkMode, WalkTargets};
use chainscan_node_client::NodeClientConfig;
use std::time::Duration;
use tracing::debug;

/// Settings after overlaying flags on the config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Node client config.
    pub node: NodeClientConfig,
    /// Index store config.
    pub index: IndexConfig,
    /// Numeric scaling.
    pub scale: ScaleConfig,
    /// The config file as read, for pass-specific tables.
    pub file: FileConfig,
}

impl Settings {
    /// Reads the config file named by `args`, if any, and resolves every setting.
    pub fn load(args: &GlobalArgs) -> anyhow::Result<Self> {
        let file = match &args.config {
            Some(path) => {
                debug!(target: "chainscan", ?path, "Loading config file");
                load_toml(path)?
            }
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    /// Resolves every setting from `args` over `file`.
    pub fn resolve(args: &GlobalArgs, file: FileConfig) -> anyhow::Result<Self> {
        Ok(Self {
            node: args.node.resolve(&file.node)?,
            index: args.index.resolve(&file.index)?,
            scale: args.scale(file.scale.unwrap_or_default()),
            file,
        })
    }

    /// The walker config for `mode` and `targets`.
    pub fn walk(&self, mode: WalkMode, targets: WalkTargets) -> WalkConfig {
        let mut config = WalkConfig::new(mode, targets).with_scale(self.scale);
        let walker = &self.file.walker;
        if let Some(ms) = walker.head_poll_delay_ms {
            config.head_poll_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = walker.rpc_retry_delay_ms {
            config.rpc_retry_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = walker.gap_retry_delay_ms {
            config.gap_retry_delay = Duration::from_millis(ms);
        }
        config
    }

    /// The contract resolver config, with `batch_size` taking precedence over the file.
    pub fn resolver(&self, batch_size: Option<u64>) -> ResolverConfig {
        let contracts = &self.file.contracts;
        let mut config = ResolverConfig::default()
            .with_scale(self.scale)
            .with_page_size(self.index.search_size);
        if let Some(size) = batch_size.or(contracts.batch_size) {
            config = config.with_batch_size(size);
        }
        if let Some(concurrency) = contracts.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(batch) = contracts.delete_batch {
            config = config.with_delete_batch(batch);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{ContractsSection, WalkerSection};
    use clap::Parser;

    #[test]
    fn test_walk_and_resolver_overlays() {
        let args =
            GlobalArgs::try_parse_from(["test", "--contracts.batch-size", "500", "--index.search-size", "2000"])
                .unwrap();
        let file = FileConfig {
            scale: Some(ScaleConfig::new(2, 1_000)),
            walker: WalkerSection { head_poll_delay_ms: Some(250), ..Default::default() },
            contracts: ContractsSection {
                batch_size: Some(50_000),
                concurrency: Some(4),
                delete_batch: None,
            },
            ..Default::default()
        };

        let settings = Settings::resolve(&args, file).unwrap();
        let walk = settings.walk(WalkMode::Follow, WalkTargets::Both);
        let resolver = settings.resolver(args.contracts_batch_size);

        assert_eq!(walk.head_poll_delay, Duration::from_millis(250));
        assert_eq!(walk.rpc_retry_delay, Duration::from_secs(4));
        assert_eq!(walk.scale, ScaleConfig::new(2, 1_000));
        assert_eq!(resolver.batch_size, 500);
        assert_eq!(resolver.concurrency, 4);
        assert_eq!(resolver.page_size, 2_000);
    }
}
