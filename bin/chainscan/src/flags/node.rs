//! Node connection flags.

use super::NodeSection;
use chainscan_node_client::NodeClientConfig;
use clap::Parser;
use std::time::Duration;
use url::Url;

/// Default node endpoint.
pub const DEFAULT_NODE_URL: &str = "http://localhost:8545";

/// Node connection arguments.
#[derive(Parser, Default, Clone, Debug, PartialEq, Eq)]
pub struct NodeArgs {
    /// JSON-RPC endpoint of the chain node.
    #[arg(long = "node.url", global = true, env = "CHAINSCAN_NODE_URL")]
    pub url: Option<Url>,
    /// Retries after a connection failure before giving up.
    #[arg(long = "node.retry-attempts", global = true, env = "CHAINSCAN_NODE_RETRY_ATTEMPTS")]
    pub retry_attempts: Option<usize>,
    /// Delay between retries in milliseconds.
    #[arg(long = "node.retry-delay-ms", global = true, env = "CHAINSCAN_NODE_RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,
    /// Per-request timeout in milliseconds. Must be shorter than the retry delay.
    #[arg(long = "node.timeout-ms", global = true, env = "CHAINSCAN_NODE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,
}

impl NodeArgs {
    /// Builds the client config from these flags, falling back to `file`.
    pub fn resolve(&self, file: &NodeSection) -> anyhow::Result<NodeClientConfig> {
        let url = match self.url.clone().or_else(|| file.url.clone()) {
            Some(url) => url,
            None => Url::parse(DEFAULT_NODE_URL)?,
        };

        let mut config = NodeClientConfig::new(url);
        if let Some(attempts) = self.retry_attempts.or(file.retry_attempts) {
            config = config.with_retry_attempts(attempts);
        }
        if let Some(delay) = self.retry_delay_ms.or(file.retry_delay_ms) {
            config = config.with_retry_delay(Duration::from_millis(delay));
        }
        if let Some(timeout) = self.timeout_ms.or(file.timeout_ms) {
            config = config.with_request_timeout(Duration::from_millis(timeout));
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_file() {
        let args = NodeArgs { retry_attempts: Some(3), ..Default::default() };
        let file = NodeSection {
            url: Some(Url::parse("http://geth:8545").unwrap()),
            retry_attempts: Some(7),
            retry_delay_ms: Some(2_000),
            timeout_ms: None,
        };

        let config = args.resolve(&file).unwrap();

        assert_eq!(config.url.as_str(), "http://geth:8545/");
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_defaults() {
        let config = NodeArgs::default().resolve(&NodeSection::default()).unwrap();
        assert_eq!(config, NodeClientConfig::new(Url::parse(DEFAULT_NODE_URL).unwrap()));
    }

    #[test]
    fn test_rejects_timeout_above_delay() {
        let args = NodeArgs { retry_delay_ms: Some(100), timeout_ms: Some(100), ..Default::default() };
        assert!(args.resolve(&NodeSection::default()).is_err());
    }
}
