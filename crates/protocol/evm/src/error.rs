use thiserror::Error;

/// Errors raised while decoding bytecode input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisassemblyError {
    /// The input is not a valid hex byte string.
    #[error("invalid bytecode hex: {0}")]
    InvalidHex(String),
}
