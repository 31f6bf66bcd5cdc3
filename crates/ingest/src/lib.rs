#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod walker;
pub use walker::{
    BlockWalker, PendingBlock, WalkConfig, WalkError, WalkErrorKind, WalkMode, WalkStep,
    WalkSummary, WalkTargets,
};

mod contracts;
pub use contracts::{
    BlockSpan, ContractResolver, PassSummary, ResolverConfig, ResolverError, Window,
};

mod stats;
pub use stats::IndexStats;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
