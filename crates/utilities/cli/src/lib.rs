#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod backtrace;

mod error;
pub use error::{CliError, CliResult, PrometheusError};

mod styles;
pub use styles::cli_styles;

mod subscriber;
pub use subscriber::{init_tracing_subscriber, verbosity_level};

mod prometheus;
pub use prometheus::init_prometheus_server;

mod config_file;
pub use config_file::load_toml;

pub mod log;
pub mod metrics_args;
