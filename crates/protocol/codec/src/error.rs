//! Error types for the codec.

use thiserror::Error;

/// Errors raised while normalizing node records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// A hex quantity could not be parsed.
    #[error("invalid quantity for `{field}`: {value:?}")]
    InvalidQuantity {
        /// The record field being parsed.
        field: &'static str,
        /// The raw value received from the node.
        value: String,
    },
    /// A quantity does not fit the target integer width.
    #[error("quantity for `{field}` overflows: {value:?}")]
    QuantityOverflow {
        /// The record field being parsed.
        field: &'static str,
        /// The raw value received from the node.
        value: String,
    },
    /// A hex byte string could not be decoded.
    #[error("invalid hex for `{field}`: {value:?}")]
    InvalidHex {
        /// The record field being decoded.
        field: &'static str,
        /// The raw value received.
        value: String,
    },
    /// A required field was absent from the node record.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// The transaction index does not fit the synthesized id scheme.
    #[error("transaction index {index} in block {block} exceeds the id stride")]
    TransactionIndexOverflow {
        /// The block number.
        block: u64,
        /// The offending transaction index.
        index: u64,
    },
}
