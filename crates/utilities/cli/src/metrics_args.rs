//! Prometheus metrics flags.

use crate::{CliResult, init_prometheus_server};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};

/// Metrics arguments.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve Prometheus metrics.
    #[arg(long = "metrics.enabled", global = true, default_value_t = false, env = "CHAINSCAN_METRICS_ENABLED")]
    pub enabled: bool,
    /// Address the metrics server listens on.
    #[arg(long = "metrics.addr", global = true, default_value = "0.0.0.0", env = "CHAINSCAN_METRICS_ADDR")]
    pub addr: IpAddr,
    /// Port the metrics server listens on.
    #[arg(long = "metrics.port", global = true, default_value_t = 9090, env = "CHAINSCAN_METRICS_PORT")]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Starts the exporter if enabled, then runs `describe` to register metric
    /// descriptions with the installed recorder.
    pub fn init_metrics(&self, describe: impl FnOnce()) -> CliResult<()> {
        if !self.enabled {
            return Ok(());
        }
        init_prometheus_server(self.addr, self.port)?;
        describe();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        metrics: MetricsArgs,
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::try_parse_from(["test"]).unwrap();
        assert_eq!(cli.metrics, MetricsArgs::default());
    }

    #[test]
    fn test_flags() {
        let cli = TestCli::try_parse_from([
            "test",
            "--metrics.enabled",
            "--metrics.addr",
            "127.0.0.1",
            "--metrics.port",
            "9191",
        ])
        .unwrap();
        assert!(cli.metrics.enabled);
        assert_eq!(cli.metrics.addr, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(cli.metrics.port, 9191);
    }

    #[test]
    fn test_disabled_skips_describe() {
        let mut called = false;
        MetricsArgs::default().init_metrics(|| called = true).unwrap();
        assert!(!called);
    }
}
