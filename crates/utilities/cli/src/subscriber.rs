//! Tracing subscriber setup.

use crate::CliError;
use tracing::Level;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Maps a `-v` count to a log level, starting at info.
pub const fn verbosity_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global fmt subscriber.
///
/// Without an explicit `filter`, `RUST_LOG` directives apply on top of the level
/// selected by `verbosity`.
pub fn init_tracing_subscriber(verbosity: u8, filter: Option<EnvFilter>) -> Result<(), CliError> {
    let filter = filter.unwrap_or_else(|| {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(verbosity_level(verbosity)).into())
            .from_env_lossy()
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| CliError::Tracing(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Level::INFO)]
    #[case(1, Level::DEBUG)]
    #[case(2, Level::TRACE)]
    #[case(9, Level::TRACE)]
    fn test_verbosity_level(#[case] verbosity: u8, #[case] level: Level) {
        assert_eq!(verbosity_level(verbosity), level);
    }
}
