//! Index store connection flags.

use super::IndexSection;
use chainscan_index::IndexConfig;
use clap::Parser;
use std::time::Duration;
use url::Url;

/// Default index store endpoint.
pub const DEFAULT_INDEX_URL: &str = "http://localhost:9200";

/// Index store connection arguments.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct IndexArgs {
    /// REST endpoint of the Elasticsearch cluster.
    #[arg(long = "index.url", global = true, env = "CHAINSCAN_INDEX_URL")]
    pub url: Option<Url>,
    /// Prefix prepended to the blocks, transactions and contracts index names.
    #[arg(long = "index.prefix", global = true, env = "CHAINSCAN_INDEX_PREFIX")]
    pub prefix: Option<String>,
    /// Delay between retries while the cluster is unreachable, in milliseconds.
    #[arg(long = "index.retry-delay-ms", global = true, env = "CHAINSCAN_INDEX_RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,
    /// Retry ceiling while the cluster is unreachable. Unbounded when unset.
    #[arg(long = "index.retry-attempts", global = true, env = "CHAINSCAN_INDEX_RETRY_ATTEMPTS")]
    pub retry_attempts: Option<usize>,
    /// Hits per search page.
    #[arg(long = "index.search-size", global = true, env = "CHAINSCAN_INDEX_SEARCH_SIZE")]
    pub search_size: Option<usize>,
}

impl IndexArgs {
    /// Builds the store config from these flags, falling back to `file`.
    pub fn resolve(&self, file: &IndexSection) -> anyhow::Result<IndexConfig> {
        let url = match self.url.clone().or_else(|| file.url.clone()) {
            Some(url) => url,
            None => Url::parse(DEFAULT_INDEX_URL)?,
        };

        let mut config = IndexConfig::new(url);
        if let Some(prefix) = self.prefix.as_deref().or(file.prefix.as_deref()) {
            config = config.with_prefix(prefix);
        }
        if let Some(delay) = self.retry_delay_ms.or(file.retry_delay_ms) {
            config = config.with_retry_delay(Duration::from_millis(delay));
        }
        if let Some(attempts) = self.retry_attempts.or(file.retry_attempts) {
            config = config.with_retry_attempts(attempts);
        }
        if let Some(size) = self.search_size.or(file.search_size) {
            config = config.with_search_size(size);
        }
        if let Some(shards) = file.shards {
            config.shards = shards;
        }
        if let Some(replicas) = file.replicas {
            config.replicas = replicas;
        }
        config.validate()?;
        Ok(config)
    }
}
