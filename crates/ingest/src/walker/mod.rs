//! The block walker: an explicit state machine over block numbers.

mod config;
pub use config::{WalkConfig, WalkMode, WalkTargets};

mod error;
pub use error::{WalkError, WalkErrorKind};

mod step;
pub use step::{PendingBlock, WalkStep};

mod summary;
pub use summary::WalkSummary;

mod driver;
pub use driver::BlockWalker;
