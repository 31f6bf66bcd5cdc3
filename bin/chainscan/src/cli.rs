//! Contains the chainscan CLI.

use crate::{commands::Commands, flags::GlobalArgs};
use anyhow::Result;
use chainscan_cli::cli_styles;
use clap::Parser;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// The chainscan CLI.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, styles = cli_styles(), long_about = None)]
pub struct Cli {
    /// Global arguments for the CLI.
    #[command(flatten)]
    pub global: GlobalArgs,
    /// The mode to run.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Runs the CLI.
    pub fn run(self) -> Result<()> {
        let Self { global, command } = self;
        Self::init_stack(&global)?;
        Self::run_until_shutdown(|cancel| command.run(&global, cancel))
    }

    /// Installs the tracing subscriber and, when enabled, the Prometheus recorder.
    pub fn init_stack(global: &GlobalArgs) -> Result<()> {
        global.log_args.init_tracing()?;
        global.metrics.init_metrics(|| {
            chainscan_node_client::Metrics::init();
            chainscan_index::Metrics::init();
            chainscan_ingest::Metrics::init();
        })?;
        Ok(())
    }

    /// Runs `run` on a fresh runtime, cancelling its token on SIGINT or SIGTERM.
    pub fn run_until_shutdown<F, Fut>(run: F) -> Result<()>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let rt = Self::tokio_runtime()?;
        rt.block_on(async {
            let cancel = CancellationToken::new();
            let signal = cancel.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                signal.cancel();
            });
            run(cancel).await
        })
    }

    /// Creates a new default tokio multi-thread [Runtime](tokio::runtime::Runtime) with all
    /// features enabled.
    pub fn tokio_runtime() -> Result<tokio::runtime::Runtime, std::io::Error> {
        tokio::runtime::Builder::new_multi_thread().enable_all().build()
    }
}

/// Resolves on SIGINT or SIGTERM. A handler that cannot be installed never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(target: "chainscan", %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(target: "chainscan", %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(target: "chainscan", "Received SIGINT (Ctrl+C), shutting down"),
        _ = terminate => info!(target: "chainscan", "Received SIGTERM, shutting down"),
    }
}
