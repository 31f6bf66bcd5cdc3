use derive_more::Display;

/// The kinds of record the indexer stores, one index each.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// Block documents, keyed by block number.
    #[display("block")]
    Block,
    /// Transaction documents, keyed by `block * 100000 + index`.
    #[display("transaction")]
    Transaction,
    /// Contract documents, keyed by contract address.
    #[display("contract")]
    Contract,
}

impl RecordKind {
    /// All record kinds.
    pub const ALL: [Self; 3] = [Self::Block, Self::Transaction, Self::Contract];
}
