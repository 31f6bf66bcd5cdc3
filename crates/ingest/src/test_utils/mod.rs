//! In-memory fakes of the node and the index store for pipeline tests.

mod journal;
pub use journal::Journal;

mod fixtures;
pub use fixtures::{creation_transaction, raw_block, raw_transaction, sender};

mod chain;
pub use chain::{MockChain, NodeCall, NodeFault};

mod index;
pub use index::{IndexOp, MemoryIndex};
