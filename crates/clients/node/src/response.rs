use alloy_json_rpc::ErrorPayload;

/// The outcome of a node call that reached the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeResponse<T> {
    /// The node returned a result.
    Found(T),
    /// The node returned `null`, e.g. for a block that has not been produced yet.
    Null,
    /// The node answered with a JSON-RPC error object.
    RpcError(ErrorPayload),
}

impl<T> NodeResponse<T> {
    /// Returns the result, discarding `Null` and error payloads.
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    /// Maps the found value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> NodeResponse<U> {
        match self {
            Self::Found(value) => NodeResponse::Found(f(value)),
            Self::Null => NodeResponse::Null,
            Self::RpcError(payload) => NodeResponse::RpcError(payload),
        }
    }
}

impl<T> From<Option<T>> for NodeResponse<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Found)
    }
}
