//! Index store configuration.

use crate::{IndexError, RecordKind};
use std::time::Duration;
use url::Url;

/// Largest page a single search returns.
pub const DEFAULT_SEARCH_SIZE: usize = 10_000;

/// Connection and layout settings for an [`ElasticIndex`](crate::ElasticIndex).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Base URL of the REST endpoint.
    pub url: Url,
    /// Index holding block documents.
    pub blocks_index: String,
    /// Index holding transaction documents.
    pub transactions_index: String,
    /// Index holding contract documents.
    pub contracts_index: String,
    /// Delay between attempts while the store is unreachable.
    pub retry_delay: Duration,
    /// Retry ceiling for transient failures. `None` retries forever.
    pub retry_attempts: Option<usize>,
    /// Deadline for a single request.
    pub request_timeout: Duration,
    /// Maximum hits returned by one search.
    pub search_size: usize,
    /// Primary shards per index, used when creating indices.
    pub shards: u32,
    /// Replicas per index, used when creating indices.
    pub replicas: u32,
}

impl IndexConfig {
    /// Creates a config with the default index names and retry policy.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            blocks_index: "blocks".to_string(),
            transactions_index: "transactions".to_string(),
            contracts_index: "contracts".to_string(),
            retry_delay: Duration::from_secs(4),
            retry_attempts: None,
            request_timeout: Duration::from_secs(30),
            search_size: DEFAULT_SEARCH_SIZE,
            shards: 1,
            replicas: 0,
        }
    }

    /// Prefixes every index name with `prefix`.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        for name in
            [&mut self.blocks_index, &mut self.transactions_index, &mut self.contracts_index]
        {
            name.insert_str(0, prefix);
        }
        self
    }

    /// Sets the retry delay.
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Bounds the number of retries for transient failures.
    pub const fn with_retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = Some(attempts);
        self
    }

    /// Sets the search page size.
    pub const fn with_search_size(mut self, size: usize) -> Self {
        self.search_size = size;
        self
    }

    /// Returns the index name for `kind`.
    pub fn index_name(&self, kind: RecordKind) -> &str {
        match kind {
            RecordKind::Block => &self.blocks_index,
            RecordKind::Transaction => &self.transactions_index,
            RecordKind::Contract => &self.contracts_index,
        }
    }

    /// Checks the configuration for unusable values.
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.search_size == 0 {
            return Err(IndexError::InvalidConfig("search size must be non-zero".into()));
        }
        let names = [&self.blocks_index, &self.transactions_index, &self.contracts_index];
        if names.iter().any(|name| name.is_empty()) {
            return Err(IndexError::InvalidConfig("index names must be non-empty".into()));
        }
        if names[0] == names[1] || names[1] == names[2] || names[0] == names[2] {
            return Err(IndexError::InvalidConfig("index names must be distinct".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_names() {
        let config = IndexConfig::new(Url::parse("http://localhost:9200").unwrap())
            .with_prefix("mainnet-");
        assert_eq!(config.index_name(RecordKind::Block), "mainnet-blocks");
        assert_eq!(config.index_name(RecordKind::Transaction), "mainnet-transactions");
        assert_eq!(config.index_name(RecordKind::Contract), "mainnet-contracts");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut config = IndexConfig::new(Url::parse("http://localhost:9200").unwrap());
        config.contracts_index = config.blocks_index.clone();
        assert!(matches!(config.validate(), Err(IndexError::InvalidConfig(_))));
    }
}
