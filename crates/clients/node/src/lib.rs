#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod config;
pub use config::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY, NodeClientConfig,
};

mod error;
pub use error::NodeError;

mod response;
pub use response::NodeResponse;

mod traits;
pub use traits::ChainNode;
#[cfg(any(test, feature = "test-utils"))]
pub use traits::MockChainNode;

mod client;
pub use client::NodeClient;

mod retry;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;
