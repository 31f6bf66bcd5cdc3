//! CLI flags.

mod globals;
pub use globals::GlobalArgs;

mod node;
pub use node::NodeArgs;

mod index;
pub use index::IndexArgs;

mod range;
pub use range::RangeArgs;

mod file;
pub use file::{ContractsSection, FileConfig, IndexSection, NodeSection, WalkerSection};

mod settings;
pub use settings::Settings;
