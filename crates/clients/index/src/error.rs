//! Error types for the index store.

use crate::BulkFailure;
use thiserror::Error;

/// An index store failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The store could not be reached. Retried while the retry budget lasts.
    #[error("index store unavailable: {0}")]
    Unavailable(String),
    /// The store rejected a request.
    #[error("index request failed with status {status:?}: {reason}")]
    Permanent {
        /// HTTP status, if a response was received.
        status: Option<u16>,
        /// Error text returned by the store.
        reason: String,
    },
    /// Individual items of a bulk request failed.
    #[error("{} bulk items failed, first: {}", .0.len(), .0.first().map(|f| f.reason.as_str()).unwrap_or_default())]
    BulkItems(Vec<BulkFailure>),
    /// A response or document could not be (de)serialized.
    #[error("malformed index payload: {0}")]
    Malformed(String),
    /// The store configuration is unusable.
    #[error("invalid index config: {0}")]
    InvalidConfig(String),
}

impl IndexError {
    /// Returns `true` for failures that a later attempt may not hit.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<serde_json::Error> for IndexError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
