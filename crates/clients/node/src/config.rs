//! Node client configuration.

use crate::NodeError;
use std::time::Duration;
use url::Url;

/// Default number of retries after a connection failure.
pub const DEFAULT_RETRY_ATTEMPTS: usize = 10;

/// Default delay between retries.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(4);

/// Connection settings for a [`NodeClient`](crate::NodeClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeClientConfig {
    /// The node's JSON-RPC endpoint.
    pub url: Url,
    /// Retries after the first attempt before a connection failure becomes fatal.
    pub retry_attempts: usize,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    /// Deadline for a single request. Must be shorter than `retry_delay`.
    pub request_timeout: Duration,
}

impl NodeClientConfig {
    /// Creates a config with the default retry policy.
    ///
    /// The request timeout defaults to a quarter of the retry delay.
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: Duration::from_secs(1),
        }
    }

    /// Sets the retry ceiling.
    pub const fn with_retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = attempts;
        self
    }

    /// Sets the retry delay and resets the request timeout to a quarter of it.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self.request_timeout = delay / 4;
        self
    }

    /// Overrides the request timeout.
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Checks the timeout against the retry delay.
    pub fn validate(&self) -> Result<(), NodeError> {
        if self.request_timeout.is_zero() {
            return Err(NodeError::InvalidConfig("request timeout must be non-zero".into()));
        }
        if self.request_timeout >= self.retry_delay {
            return Err(NodeError::InvalidConfig(format!(
                "request timeout {:?} must be shorter than retry delay {:?}",
                self.request_timeout, self.retry_delay
            )));
        }
        Ok(())
    }
}
