use chainscan_codec::CodecError;
use chainscan_index::IndexError;
use chainscan_node_client::NodeError;
use thiserror::Error;

/// A fatal contract pass error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// The node became unreachable.
    #[error(transparent)]
    Node(#[from] NodeError),
    /// The index store refused a write or read.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// A record could not be converted.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// The delete worker stopped unexpectedly.
    #[error("delete worker failed: {0}")]
    DeleteWorker(String),
}
