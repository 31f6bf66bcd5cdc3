use chainscan_codec::CodecError;
use chainscan_index::IndexError;
use chainscan_node_client::NodeError;
use thiserror::Error;

/// The cause of a failed walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalkErrorKind {
    /// The node became unreachable.
    #[error(transparent)]
    Node(#[from] NodeError),
    /// The index store refused a write or read.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// A record could not be given an identity.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// A fatal walk error, carrying the recovery checkpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("walk failed at block {block} (last committed: {last_committed:?}): {kind}")]
pub struct WalkError {
    /// The block being processed.
    pub block: u64,
    /// The last block fully committed before the failure.
    pub last_committed: Option<u64>,
    /// The underlying failure.
    pub kind: WalkErrorKind,
}
