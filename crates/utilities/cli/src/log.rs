//! Logging flags.

use crate::{CliResult, init_tracing_subscriber};
use clap::{ArgAction, Parser};

/// Logging arguments.
#[derive(Parser, Debug, Default, Clone, PartialEq, Eq)]
pub struct LogArgs {
    /// Verbosity: info by default, `-v` for debug, `-vv` for trace.
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub v: u8,
}

impl LogArgs {
    /// Installs the tracing subscriber for these arguments.
    pub fn init_tracing(&self) -> CliResult<()> {
        init_tracing_subscriber(self.v, None)
    }
}
