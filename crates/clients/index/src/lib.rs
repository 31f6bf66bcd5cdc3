#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[macro_use]
extern crate tracing;

mod config;
pub use config::{DEFAULT_SEARCH_SIZE, IndexConfig};

mod error;
pub use error::IndexError;

mod kind;
pub use kind::RecordKind;

mod types;
pub use types::{BulkFailure, BulkItem, BulkOutcome, CreateOutcome, Hit};

mod query;
pub use query::{BlockRange, SearchQuery, SortKey, SortOrder};

mod bulk;
pub use bulk::{BulkAction, encode_bulk, parse_bulk_response};

mod mappings;
pub use mappings::index_body;

mod traits;
#[cfg(any(test, feature = "test-utils"))]
pub use traits::MockIndexStore;
pub use traits::IndexStore;

mod client;
pub use client::ElasticIndex;

#[cfg(feature = "metrics")]
mod metrics;
#[cfg(feature = "metrics")]
pub use metrics::Metrics;
