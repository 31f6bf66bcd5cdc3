//! Windowed passes over committed records that maintain contract documents.

mod config;
pub use config::{BlockSpan, ResolverConfig, Window};

mod error;
pub use error::ResolverError;

mod summary;
pub use summary::PassSummary;

mod resolver;
pub use resolver::ContractResolver;

mod wipe;
