//! Error types for the node client.

use thiserror::Error;

/// A failure that the node client could not absorb.
///
/// RPC-level error payloads are not represented here; see
/// [`NodeResponse::RpcError`](crate::NodeResponse::RpcError).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The node could not be reached after exhausting all retries.
    #[error("node unavailable after {attempts} attempts: {reason}")]
    Unavailable {
        /// Total attempts made.
        attempts: usize,
        /// The last transport failure.
        reason: String,
    },
    /// Every attempt timed out.
    #[error("node request timed out after {attempts} attempts")]
    Timeout {
        /// Total attempts made.
        attempts: usize,
    },
    /// The transport failed in a way that retrying will not fix.
    #[error("node transport error: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("malformed node response: {0}")]
    Malformed(String),
    /// The client configuration is unusable.
    #[error("invalid node client config: {0}")]
    InvalidConfig(String),
}
