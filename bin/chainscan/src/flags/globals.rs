//! Global arguments for the CLI.

use super::{IndexArgs, NodeArgs};
use chainscan_cli::{log::LogArgs, metrics_args::MetricsArgs};
use chainscan_codec::ScaleConfig;
use clap::Parser;
use std::path::PathBuf;

/// Global arguments for the CLI.
#[derive(Parser, Default, Clone, Debug)]
pub struct GlobalArgs {
    /// Logging arguments.
    #[command(flatten)]
    pub log_args: LogArgs,
    /// Prometheus CLI arguments.
    #[command(flatten)]
    pub metrics: MetricsArgs,
    /// TOML file with node, index and pass settings. Flags take precedence.
    #[arg(long, global = true, env = "CHAINSCAN_CONFIG")]
    pub config: Option<PathBuf>,
    /// Node connection arguments.
    #[command(flatten)]
    pub node: NodeArgs,
    /// Index store connection arguments.
    #[command(flatten)]
    pub index: IndexArgs,
    /// Revision tag of the scaling quotient, stored with every scaled document.
    #[arg(long = "scale.revision", global = true, env = "CHAINSCAN_SCALE_REVISION")]
    pub scale_revision: Option<u16>,
    /// Divisor applied to value, difficulty and balance fields.
    #[arg(long = "scale.quotient", global = true, env = "CHAINSCAN_SCALE_QUOTIENT")]
    pub scale_quotient: Option<u64>,
    /// Blocks per contract pass window.
    #[arg(long = "contracts.batch-size", global = true, env = "CHAINSCAN_CONTRACTS_BATCH_SIZE")]
    pub contracts_batch_size: Option<u64>,
}

impl GlobalArgs {
    /// Overlays the scale flags on `base`.
    pub fn scale(&self, base: ScaleConfig) -> ScaleConfig {
        ScaleConfig::new(
            self.scale_revision.unwrap_or(base.revision),
            self.scale_quotient.unwrap_or(base.quotient),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_overlay() {
        let args = GlobalArgs::try_parse_from(["test", "--scale.quotient", "1000000000000000000"])
            .unwrap();
        let scale = args.scale(ScaleConfig::default());
        assert_eq!(scale.revision, ScaleConfig::default().revision);
        assert_eq!(scale.quotient, 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_defaults_are_unset() {
        let args = GlobalArgs::try_parse_from(["test"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.node.url.is_none());
        assert!(args.index.url.is_none());
        assert_eq!(args.scale(ScaleConfig::default()), ScaleConfig::default());
    }
}
